//! Column validation rules for inline edits.
//!
//! Rules are declared per column (usually in JSON options) and compiled once
//! into a [`ColumnValidator`] when the column is built. Validation happens on
//! commit; the first failing rule's message is shown in the cell.
//!
//! # Example
//!
//! ```
//! use datagrid::validation::{ColumnValidator, ValidationRule};
//! use datagrid_core::CellValue;
//!
//! let validator = ColumnValidator::new(&[
//!     ValidationRule::not_empty(),
//!     ValidationRule::pattern("^[A-Z]"),
//! ])
//! .unwrap();
//!
//! assert!(validator.validate(&CellValue::from("Apple"), &[]).is_ok());
//! assert!(validator.validate(&CellValue::from("apple"), &[]).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use datagrid_core::CellValue;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::error::GridError;

/// Host-supplied validation function.
pub type CustomRule = Arc<dyn Fn(&CellValue) -> Result<(), String> + Send + Sync>;

/// One declared validation rule.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidationRule {
    /// Rejects null and blank text.
    NotEmpty {
        #[serde(default)]
        message: Option<String>,
    },
    /// Requires a number or numeric text.
    Number {
        #[serde(default)]
        message: Option<String>,
    },
    /// Requires a boolean or `true`/`false` text.
    Boolean {
        #[serde(default)]
        message: Option<String>,
    },
    /// Rejects values already present in another row.
    Unique {
        #[serde(default)]
        message: Option<String>,
    },
    /// Like `Unique`, comparing text case-insensitively.
    IgnoreCaseUnique {
        #[serde(default)]
        message: Option<String>,
    },
    /// Requires the text to match a regular expression.
    Pattern {
        pattern: String,
        #[serde(default)]
        message: Option<String>,
    },
    /// Runs a host function. Only available from code.
    #[serde(skip)]
    Custom(CustomRule),
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEmpty { .. } => write!(f, "NotEmpty"),
            Self::Number { .. } => write!(f, "Number"),
            Self::Boolean { .. } => write!(f, "Boolean"),
            Self::Unique { .. } => write!(f, "Unique"),
            Self::IgnoreCaseUnique { .. } => write!(f, "IgnoreCaseUnique"),
            Self::Pattern { pattern, .. } => write!(f, "Pattern({pattern:?})"),
            Self::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

impl ValidationRule {
    pub fn not_empty() -> Self {
        Self::NotEmpty { message: None }
    }

    pub fn number() -> Self {
        Self::Number { message: None }
    }

    pub fn boolean() -> Self {
        Self::Boolean { message: None }
    }

    pub fn unique() -> Self {
        Self::Unique { message: None }
    }

    pub fn ignore_case_unique() -> Self {
        Self::IgnoreCaseUnique { message: None }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: None,
        }
    }

    pub fn custom(rule: impl Fn(&CellValue) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(rule))
    }

    /// Replaces the rule's message. Custom rules keep their own messages.
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::NotEmpty { message }
            | Self::Number { message }
            | Self::Boolean { message }
            | Self::Unique { message }
            | Self::IgnoreCaseUnique { message }
            | Self::Pattern { message, .. } => *message = Some(text.into()),
            Self::Custom(_) => {}
        }
        self
    }
}

#[derive(Clone)]
enum CompiledRule {
    NotEmpty(String),
    Number(String),
    Boolean(String),
    Unique(String),
    IgnoreCaseUnique(String),
    Pattern(Regex, String),
    Custom(CustomRule),
}

/// The compiled rules of one column.
#[derive(Clone, Default)]
pub struct ColumnValidator {
    rules: Vec<CompiledRule>,
}

impl fmt::Debug for ColumnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnValidator")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl ColumnValidator {
    /// Compiles a list of rules.
    ///
    /// Fails with [`GridError::InvalidPattern`] if a pattern does not compile.
    pub fn new(rules: &[ValidationRule]) -> Result<Self, GridError> {
        let or = |message: &Option<String>, default: &str| {
            message.clone().unwrap_or_else(|| default.to_string())
        };

        let rules = rules
            .iter()
            .map(|rule| {
                Ok(match rule {
                    ValidationRule::NotEmpty { message } => {
                        CompiledRule::NotEmpty(or(message, "Value is required"))
                    }
                    ValidationRule::Number { message } => {
                        CompiledRule::Number(or(message, "Value must be a number"))
                    }
                    ValidationRule::Boolean { message } => {
                        CompiledRule::Boolean(or(message, "Value must be true or false"))
                    }
                    ValidationRule::Unique { message } => {
                        CompiledRule::Unique(or(message, "Value must be unique"))
                    }
                    ValidationRule::IgnoreCaseUnique { message } => CompiledRule::IgnoreCaseUnique(
                        or(message, "Value must be unique (ignoring case)"),
                    ),
                    ValidationRule::Pattern { pattern, message } => {
                        let regex = Regex::new(pattern)
                            .map_err(|e| GridError::invalid_pattern(pattern, e.to_string()))?;
                        CompiledRule::Pattern(
                            regex,
                            or(message, "Value does not match the required format"),
                        )
                    }
                    ValidationRule::Custom(rule) => CompiledRule::Custom(Arc::clone(rule)),
                })
            })
            .collect::<Result<Vec<_>, GridError>>()?;

        Ok(Self { rules })
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if a uniqueness rule needs the other rows' values.
    pub fn needs_column_values(&self) -> bool {
        self.rules
            .iter()
            .any(|r| matches!(r, CompiledRule::Unique(_) | CompiledRule::IgnoreCaseUnique(_)))
    }

    /// Checks a value. `others` holds the column's values in every other row.
    ///
    /// Returns the first failing rule's message. Apart from `notEmpty`, rules
    /// let null and blank values through.
    pub fn validate(&self, value: &CellValue, others: &[CellValue]) -> Result<(), String> {
        let text = value.to_string();
        let blank = value.is_null() || text.trim().is_empty();

        for rule in &self.rules {
            let ok = match rule {
                CompiledRule::NotEmpty(_) => !blank,
                _ if blank && !matches!(rule, CompiledRule::Custom(_)) => true,
                CompiledRule::Number(_) => value.to_number_lossy().is_some(),
                CompiledRule::Boolean(_) => {
                    value.as_bool().is_some()
                        || text.trim().eq_ignore_ascii_case("true")
                        || text.trim().eq_ignore_ascii_case("false")
                }
                CompiledRule::Unique(_) => others.iter().all(|o| o.to_string() != text),
                CompiledRule::IgnoreCaseUnique(_) => {
                    let lower = text.to_lowercase();
                    others.iter().all(|o| o.to_string().to_lowercase() != lower)
                }
                CompiledRule::Pattern(regex, _) => regex.is_match(&text),
                CompiledRule::Custom(rule) => {
                    rule(value)?;
                    true
                }
            };

            if !ok {
                return Err(match rule {
                    CompiledRule::NotEmpty(m)
                    | CompiledRule::Number(m)
                    | CompiledRule::Boolean(m)
                    | CompiledRule::Unique(m)
                    | CompiledRule::IgnoreCaseUnique(m)
                    | CompiledRule::Pattern(_, m) => m.clone(),
                    CompiledRule::Custom(_) => String::from("Invalid value"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rules: &[ValidationRule], value: impl Into<CellValue>, others: &[CellValue]) -> Result<(), String> {
        ColumnValidator::new(rules).unwrap().validate(&value.into(), others)
    }

    #[test]
    fn test_not_empty() {
        let rules = [ValidationRule::not_empty().with_message("Name please")];
        assert_eq!(check(&rules, "  ", &[]), Err("Name please".to_string()));
        assert_eq!(check(&rules, CellValue::Null, &[]), Err("Name please".to_string()));
        assert!(check(&rules, "x", &[]).is_ok());
    }

    #[test]
    fn test_blank_passes_other_rules() {
        let rules = [ValidationRule::number(), ValidationRule::pattern("^a")];
        assert!(check(&rules, "", &[]).is_ok());
        assert!(check(&rules, "12", &[]).is_err());
        assert!(check(&rules, "abc", &[]).is_err());
    }

    #[test]
    fn test_number_and_boolean() {
        assert!(check(&[ValidationRule::number()], " 3.5 ", &[]).is_ok());
        assert!(check(&[ValidationRule::number()], "x", &[]).is_err());
        assert!(check(&[ValidationRule::boolean()], "TRUE", &[]).is_ok());
        assert!(check(&[ValidationRule::boolean()], true, &[]).is_ok());
        assert!(check(&[ValidationRule::boolean()], "yes", &[]).is_err());
    }

    #[test]
    fn test_uniqueness() {
        let others = [CellValue::from("Alpha"), CellValue::from("beta")];
        assert!(check(&[ValidationRule::unique()], "alpha", &others).is_ok());
        assert!(check(&[ValidationRule::unique()], "Alpha", &others).is_err());
        assert!(check(&[ValidationRule::ignore_case_unique()], "ALPHA", &others).is_err());
    }

    #[test]
    fn test_custom_rule() {
        let rules = [ValidationRule::custom(|v| match v.as_number() {
            Some(n) if n < 0.0 => Err("Must not be negative".to_string()),
            _ => Ok(()),
        })];
        assert_eq!(check(&rules, -1.0, &[]), Err("Must not be negative".to_string()));
        assert!(check(&rules, 1.0, &[]).is_ok());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ColumnValidator::new(&[ValidationRule::pattern("(")]).unwrap_err();
        assert!(matches!(err, GridError::InvalidPattern { .. }));
    }

    #[test]
    fn test_rules_from_json() {
        let rules: Vec<ValidationRule> = serde_json::from_str(
            r#"[{"type": "notEmpty"}, {"type": "pattern", "pattern": "^\\d+$", "message": "Digits only"}]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(check(&rules, "12a", &[]), Err("Digits only".to_string()));
    }
}
