#[derive(thiserror::Error, Debug)]
pub enum FsapiError {
    #[error("access denied - incorrect PIN")]
    InvalidPin,

    #[error("wrong session id or invalid command: `{0}`")]
    InvalidSession(String),

    #[error("FSAPI node `{0}` is not implemented by this device")]
    NotImplemented(String),

    #[error("device is not in the correct mode for `{0}`")]
    WrongMode(String),

    #[error("command `{0}` failed, value is not in range")]
    OutOfRange(String),

    #[error("`{0}` is read only and can't be SET")]
    ReadOnly(String),

    #[error("device unreachable: {0}")]
    Unreachable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unexpected http status {status}: `{body}`")]
    UnexpectedStatus { status: u16, body: String },

    #[error("protocol error: {0}")]
    ProtocolError(String),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot parse xml: `{0}`")]
    XmlParseError(#[from] xmltree::ParseError),

    #[error("cannot deserialize xml: `{0}`")]
    XmlDeserializeError(#[from] serde_xml_rs::Error),
}

pub type Result<T> = std::result::Result<T, FsapiError>;
