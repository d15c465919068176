//! User-defined event categories (label + colour).

use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, DaybookResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> DaybookResult<Self> {
        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into().trim().to_string(),
            color: color.into().to_lowercase(),
        };
        category.validate()?;
        Ok(category)
    }

    pub fn validate(&self) -> DaybookResult<()> {
        if self.name.is_empty() {
            return Err(DaybookError::validation("Category name cannot be empty"));
        }
        if !is_hex_color(&self.color) {
            return Err(DaybookError::validation(format!(
                "Invalid colour '{}'. Expected #RRGGBB",
                self.color
            )));
        }
        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_colors() {
        let category = Category::new("Work", "#1E90FF").unwrap();
        assert_eq!(category.color, "#1e90ff");
    }

    #[test]
    fn rejects_bad_colors_and_names() {
        assert!(Category::new("Work", "blue").is_err());
        assert!(Category::new("Work", "#12345").is_err());
        assert!(Category::new("Work", "#12345g").is_err());
        assert!(Category::new("  ", "#123456").is_err());
    }
}
