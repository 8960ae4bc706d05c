use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};
use xmltree::Element;

use crate::api::{self, HttpTransport, Node, Transport, TransportError, CREATE_SESSION};
use crate::config::{ClientConfig, Cooldown};
use crate::error::{FsapiError, Result};
use crate::fsapi_xml::{self as xml, DataItem, FsStatus, ValueKind};
use crate::list::ListReader;
use crate::models::{Equaliser, PlayerMode};
use crate::nav::NavPath;
use crate::throttle::Throttle;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Knobs of a single [`FsapiClient::call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Create a fresh session before sending the request.
    pub force_new_session: bool,
    /// Replay once with a fresh session after a 404 or a transport failure.
    pub retry_with_session: bool,
    pub cooldown: Cooldown,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            force_new_session: false,
            retry_with_session: true,
            cooldown: Cooldown::Read,
        }
    }
}

impl CallOptions {
    pub fn with_cooldown(cooldown: Cooldown) -> Self {
        Self {
            cooldown,
            ..Self::default()
        }
    }
}

/// A successful answer: `status` is either FS_OK or FS_LIST_END.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: FsStatus,
    pub doc: Element,
}

/// Failures a replay with a new session may cure.
enum Recoverable {
    SessionRejected,
    Transport(TransportError),
}

enum Failure {
    Recoverable(Recoverable),
    Fatal(FsapiError),
}

/// Value computed by the first successful fetch and kept for the lifetime of
/// the client. Unlike [`NavPath`] it is never invalidated.
pub(crate) struct Cached<T> {
    slot: Mutex<Option<T>>,
}

impl<T: Clone> Cached<T> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value or runs `fetch`. Only a `Some` result is kept.
    pub(crate) fn get_or_fetch(&self, fetch: impl FnOnce() -> Result<Option<T>>) -> Result<Option<T>> {
        let mut slot = lock(&self.slot);
        if let Some(value) = slot.as_ref() {
            return Ok(Some(value.clone()));
        }
        let value = fetch()?;
        *slot = value.clone();
        Ok(value)
    }
}

/// The main interface to an FSAPI device.
///
/// Owns the session and serializes all device calls through one throttle gate,
/// so a client can be shared (e.g. in an `Arc`) by many threads.
pub struct FsapiClient<T: Transport = HttpTransport> {
    transport: T,
    webfsapi: String,
    pin: String,
    config: ClientConfig,
    sid: Mutex<Option<String>>,
    throttle: Throttle,
    pub(crate) nav: Mutex<NavPath>,
    pub(crate) modes: Cached<Vec<PlayerMode>>,
    pub(crate) equalisers: Cached<Vec<Equaliser>>,
    pub(crate) volume_steps: Cached<u8>,
}

impl<T: Transport> fmt::Debug for FsapiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsapiClient")
            .field("webfsapi", &self.webfsapi)
            .field("sid", &*lock(&self.sid))
            .field("config", &self.config)
            .finish()
    }
}

impl FsapiClient<HttpTransport> {
    /// Discovers the webfsapi endpoint at `device_url` (e.g.
    /// `http://192.168.1.20/device`) and returns a client talking to it.
    pub fn connect(device_url: &str, pin: impl ToString, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        let info = api::discover(&transport, device_url)?;
        let webfsapi = info.webfsapi.unwrap_or_default();
        debug!("webfsapi endpoint of {} is {}", device_url, webfsapi);
        Ok(Self::with_transport(transport, webfsapi, pin, config))
    }
}

impl<T: Transport> FsapiClient<T> {
    pub fn with_transport(
        transport: T,
        webfsapi: impl ToString,
        pin: impl ToString,
        config: ClientConfig,
    ) -> Self {
        FsapiClient {
            transport,
            webfsapi: webfsapi.to_string().trim_end_matches('/').to_string(),
            pin: pin.to_string(),
            config,
            sid: Mutex::new(None),
            throttle: Throttle::new(),
            nav: Mutex::new(NavPath::new()),
            modes: Cached::new(),
            equalisers: Cached::new(),
            volume_steps: Cached::new(),
        }
    }

    pub fn webfsapi(&self) -> &str {
        &self.webfsapi
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session_id(&self) -> Option<String> {
        lock(&self.sid).clone()
    }

    /// The folder path the client believes the device is in.
    pub fn nav_path(&self) -> Vec<u32> {
        lock(&self.nav).as_slice().to_vec()
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

    /// Executes an FSAPI call like `GET/netRemote.sys.power`.
    ///
    /// A 404 (expired session) or a transport failure is answered with exactly
    /// one replay using a freshly created session. Everything else, and a second
    /// failure, is returned to the caller.
    pub fn call(
        &self,
        path: &str,
        params: &[(&str, DataItem)],
        options: CallOptions,
    ) -> Result<Response> {
        let may_retry = options.retry_with_session && !options.force_new_session;

        match self.attempt(path, params, options.force_new_session, options.cooldown) {
            Err(Failure::Recoverable(reason)) if may_retry => {
                match &reason {
                    Recoverable::SessionRejected => {
                        warn!("call to {}/{} failed with 404, retrying with new session", self.webfsapi, path)
                    }
                    Recoverable::Transport(err) => {
                        warn!("call to {}/{} failed ({}), retrying with new session", self.webfsapi, path, err)
                    }
                }
                self.attempt(path, params, true, options.cooldown)
                    .map_err(|failure| self.failure_to_error(path, failure))
            }
            result => result.map_err(|failure| self.failure_to_error(path, failure)),
        }
    }

    fn failure_to_error(&self, path: &str, failure: Failure) -> FsapiError {
        match failure {
            Failure::Fatal(err) => err,
            Failure::Recoverable(Recoverable::SessionRejected) => FsapiError::InvalidSession(path.to_string()),
            Failure::Recoverable(Recoverable::Transport(TransportError::Timeout)) => FsapiError::Unreachable(
                format!("{} did not respond within {:?}", self.webfsapi, self.config.timeout),
            ),
            Failure::Recoverable(Recoverable::Transport(err)) => {
                FsapiError::Unreachable(format!("could not connect to {}: {}", self.webfsapi, err))
            }
        }
    }

    fn attempt(
        &self,
        path: &str,
        params: &[(&str, DataItem)],
        force_new_session: bool,
        cooldown: Cooldown,
    ) -> std::result::Result<Response, Failure> {
        if force_new_session {
            let sid = self.create_session().map_err(Failure::Fatal)?;
            *lock(&self.sid) = sid;
        }

        let mut query: Vec<(&str, String)> = vec![("pin", self.pin.clone())];
        if let Some(sid) = self.session_id() {
            query.push(("sid", sid));
        }
        query.extend(params.iter().map(|(name, value)| (*name, value.to_string())));

        let url = format!("{}/{}", self.webfsapi, path);
        let response = self
            .throttle
            .run(self.config.cooldown(cooldown), || self.transport.get(&url, &query))
            .map_err(|err| Failure::Recoverable(Recoverable::Transport(err)))?;

        debug!("called {} with {:?}: {}", path, params, response.status);

        match response.status {
            200 => {}
            403 => return Err(Failure::Fatal(FsapiError::InvalidPin)),
            404 => return Err(Failure::Recoverable(Recoverable::SessionRejected)),
            status => {
                return Err(Failure::Fatal(FsapiError::UnexpectedStatus {
                    status,
                    body: response.body,
                }))
            }
        }

        let doc = xml::parse_response(&response.body).map_err(Failure::Fatal)?;
        let status = xml::status(&doc);

        let err = match status {
            Some(status @ (FsStatus::Ok | FsStatus::ListEnd)) => return Ok(Response { status, doc }),
            Some(FsStatus::NodeDoesNotExist) => FsapiError::NotImplemented(path.to_string()),
            Some(FsStatus::NodeBlocked) => FsapiError::WrongMode(path.to_string()),
            Some(FsStatus::Fail) => FsapiError::OutOfRange(path.to_string()),
            Some(FsStatus::PacketBad) => FsapiError::ReadOnly(path.to_string()),
            Some(FsStatus::Unknown(status)) => {
                error!("unexpected FSAPI status {} for {}", status, path);
                FsapiError::ProtocolError(format!("unexpected FSAPI status {:?}", status))
            }
            None => FsapiError::ProtocolError(format!("response to {} carries no status", path)),
        };
        Err(Failure::Fatal(err))
    }

    fn create_session(&self) -> Result<Option<String>> {
        let options = CallOptions {
            retry_with_session: false,
            ..CallOptions::default()
        };
        let response = self.call(CREATE_SESSION, &[], options)?;
        let sid = xml::unpack_xml(&response.doc, "sessionId");
        debug!("created session {:?}", sid);
        Ok(sid)
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
    // typed helpers

    pub fn handle_get(&self, node: Node) -> Result<Response> {
        self.call(&node.get_path(), &[], CallOptions::default())
    }

    /// Sets `node` to `value`. Returns whether the device answered FS_OK.
    pub fn handle_set(&self, node: Node, value: impl Into<DataItem>, cooldown: Cooldown) -> Result<bool> {
        let response = self.call(
            &node.set_path(),
            &[("value", value.into())],
            CallOptions::with_cooldown(cooldown),
        )?;
        Ok(response.status == FsStatus::Ok)
    }

    pub fn handle_text(&self, node: Node) -> Result<Option<String>> {
        Ok(xml::decode_text(&self.handle_get(node)?.doc))
    }

    pub fn handle_int(&self, node: Node) -> Result<Option<u8>> {
        xml::decode_number(&self.handle_get(node)?.doc, ValueKind::U8)
    }

    pub fn handle_long(&self, node: Node) -> Result<Option<u32>> {
        xml::decode_number(&self.handle_get(node)?.doc, ValueKind::U32)
    }

    pub fn handle_signed_long(&self, node: Node) -> Result<Option<i32>> {
        xml::decode_number(&self.handle_get(node)?.doc, ValueKind::S32)
    }

    pub fn handle_bool(&self, node: Node) -> Result<Option<bool>> {
        xml::decode_bool(&self.handle_get(node)?.doc)
    }

    /// Lazily reads all rows of the list `node`, see [`ListReader`].
    pub fn handle_list(&self, node: Node) -> ListReader<'_, T> {
        ListReader::new(self, node, self.config.page_size)
    }
}
