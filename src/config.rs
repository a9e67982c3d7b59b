use crate::constants::DEFAULT_TEMPLATE_SUFFIX;
use crate::error::{Error, Result};

/// Settings shared by both run modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Suffix marking a file or directory name as templated, e.g. `.filetemplate`
    pub template_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self { template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string() }
    }
}

impl Config {
    pub fn new(template_suffix: impl Into<String>) -> Result<Self> {
        let config = Self { template_suffix: template_suffix.into() };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.template_suffix.is_empty() {
            return Err(Error::ConfigValidation("template_suffix must not be empty".into()));
        }
        if !self.template_suffix.starts_with('.') || self.template_suffix.len() < 2 {
            return Err(Error::ConfigValidation(
                "template_suffix must start with '.' and have at least 1 character after it"
                    .into(),
            ));
        }
        Ok(())
    }

    /// The templated part of `file_name`, or `None` if it does not carry the
    /// template suffix.
    pub fn template_name<'n>(&self, file_name: &'n str) -> Option<&'n str> {
        file_name.strip_suffix(self.template_suffix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_suffix_is_valid() {
        let config = Config::default();
        assert_eq!(config.template_suffix, ".filetemplate");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_suffix() {
        assert!(matches!(Config::new(""), Err(Error::ConfigValidation(_))));
    }

    #[test]
    fn rejects_suffix_without_leading_dot() {
        assert!(matches!(Config::new("tpl"), Err(Error::ConfigValidation(_))));
        assert!(matches!(Config::new("."), Err(Error::ConfigValidation(_))));
    }

    #[test]
    fn strips_the_suffix_from_templated_names() {
        let config = Config::new(".tpl").unwrap();
        assert_eq!(config.template_name("{{@A@}}.txt.tpl"), Some("{{@A@}}.txt"));
        assert_eq!(config.template_name("plain.txt"), None);
    }
}
