pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid color for {role}: {value:?}")]
    InvalidColor { role: &'static str, value: String },
}
