use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{FsapiError, Result};
use crate::fsapi_xml as xml;

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// The FSAPI nodes this library knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    // sys
    Power,
    Mode,
    FriendlyName,
    RadioId,
    Version,
    ValidModes,
    EqPresets,
    Sleep,
    // audio
    EqPreset,
    EqLoudness,
    Bass,
    Treble,
    VolumeSteps,
    Volume,
    Mute,
    // play
    PlayStatus,
    PlayName,
    PlayControl,
    Shuffle,
    Repeat,
    Position,
    Rate,
    PlayText,
    PlayArtist,
    PlayAlbum,
    PlayGraphicUri,
    PlayDuration,
    // nav
    NavState,
    NavNumItems,
    NavList,
    Navigate,
    SelectItem,
    Presets,
    SelectPreset,
}

impl Node {
    pub fn path(&self) -> &'static str {
        use Node::*;
        match self {
            Power => "netRemote.sys.power",
            Mode => "netRemote.sys.mode",
            FriendlyName => "netRemote.sys.info.friendlyName",
            RadioId => "netRemote.sys.info.radioId",
            Version => "netRemote.sys.info.version",
            ValidModes => "netRemote.sys.caps.validModes",
            EqPresets => "netRemote.sys.caps.eqPresets",
            Sleep => "netRemote.sys.sleep",
            EqPreset => "netRemote.sys.audio.eqpreset",
            EqLoudness => "netRemote.sys.audio.eqloudness",
            Bass => "netRemote.sys.audio.eqcustom.param0",
            Treble => "netRemote.sys.audio.eqcustom.param1",
            VolumeSteps => "netRemote.sys.caps.volumeSteps",
            Volume => "netRemote.sys.audio.volume",
            Mute => "netRemote.sys.audio.mute",
            PlayStatus => "netRemote.play.status",
            PlayName => "netRemote.play.info.name",
            PlayControl => "netRemote.play.control",
            Shuffle => "netRemote.play.shuffle",
            Repeat => "netRemote.play.repeat",
            Position => "netRemote.play.position",
            Rate => "netRemote.play.rate",
            PlayText => "netRemote.play.info.text",
            PlayArtist => "netRemote.play.info.artist",
            PlayAlbum => "netRemote.play.info.album",
            PlayGraphicUri => "netRemote.play.info.graphicUri",
            PlayDuration => "netRemote.play.info.duration",
            NavState => "netRemote.nav.state",
            NavNumItems => "netRemote.nav.numitems",
            NavList => "netRemote.nav.list",
            Navigate => "netRemote.nav.action.navigate",
            SelectItem => "netRemote.nav.action.selectItem",
            Presets => "netRemote.nav.presets",
            SelectPreset => "netRemote.nav.action.selectPreset",
        }
    }

    pub fn get_path(&self) -> String {
        format!("GET/{}", self.path())
    }

    pub fn set_path(&self) -> String {
        format!("SET/{}", self.path())
    }

    pub fn list_path(&self, offset: i64) -> String {
        format!("LIST_GET_NEXT/{}/{}", self.path(), offset)
    }
}

pub(crate) const CREATE_SESSION: &str = "CREATE_SESSION";

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Status and body of an answered HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Performs the HTTP GET requests. The timeout is a property of the transport.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<HttpResponse, TransportError> {
        (**self).get(url, query)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}

/// [`Transport`] sending real requests using a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<HttpResponse, TransportError> {
        let response = self.client.get(url).query(query).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Fetches the advertisement document at `device_url` (usually
/// `http://<ip>/device`) and reads the `webfsapi` base url from it.
pub fn discover(transport: &impl Transport, device_url: &str) -> Result<xml::DeviceInfo> {
    let response = transport
        .get(device_url, &[])
        .map_err(|err| FsapiError::Unreachable(format!("{}: {}", device_url, err)))?;
    tracing::debug!("discovery at {} status: {}", device_url, response.status);

    if response.status != 200 {
        return Err(FsapiError::UnexpectedStatus {
            status: response.status,
            body: response.body,
        });
    }

    let info = xml::parse_device_info(&response.body)?;
    match &info.webfsapi {
        Some(url) if !url.trim().is_empty() => Ok(info),
        _ => Err(FsapiError::ProtocolError(format!(
            "could not retrieve webfsapi endpoint from {}",
            device_url
        ))),
    }
}
