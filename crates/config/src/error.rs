use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The merged configuration could not be deserialized.
    #[display("invalid configuration")]
    Parse,
    /// The configuration file extension is not one of `toml`, `yaml`, `yml`
    /// or `json`.
    #[display("unsupported configuration format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
}
