use super::conditions::Condition;

/// Declares an association to load alongside the primary rows
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub association: String,
    /// Restrict the loaded attributes; `None` loads every field
    pub attributes: Option<Vec<String>>,
    pub conditions: Vec<Condition>,
}

impl Include {
    pub fn new(association: &str) -> Self {
        Self {
            association: association.to_string(),
            attributes: None,
            conditions: Vec::new(),
        }
    }

    pub fn attributes(mut self, attributes: &[&str]) -> Self {
        self.attributes = Some(attributes.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn where_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

impl From<&str> for Include {
    fn from(association: &str) -> Self {
        Include::new(association)
    }
}

/// An inner join onto a link table
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub on_condition: String,
}

impl Join {
    pub fn inner(table: &str, on_condition: &str) -> Self {
        Self {
            table: table.to_string(),
            on_condition: on_condition.to_string(),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        format!("INNER JOIN {} ON {}", self.table, self.on_condition)
    }
}
