use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntlError {
    #[error("invalid replacement template `{template}`: {source}")]
    InvalidReplaceTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid date format `{0}`")]
    InvalidDateFormat(String),
}
