#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use fsapi::{ClientConfig, FsapiClient, HttpResponse, Transport, TransportError};

pub const BASE: &str = "http://radio.local/fsapi";
pub const PIN: &str = "1234";

pub type Reply = Result<HttpResponse, TransportError>;

#[derive(Debug, Clone)]
pub struct Request {
    pub path: String,
    pub params: HashMap<String, String>,
    pub started: Instant,
    pub finished: Instant,
}

type Handler = Box<dyn Fn(&str, &HashMap<String, String>) -> Reply + Send + Sync>;

/// In-memory device. Every request is recorded, the handler decides the answer.
pub struct FakeDevice {
    handler: Handler,
    requests: Mutex<Vec<Request>>,
}

impl FakeDevice {
    pub fn new(handler: impl Fn(&str, &HashMap<String, String>) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answers requests with `replies` in order.
    pub fn scripted(replies: Vec<Reply>) -> Arc<Self> {
        let replies = Mutex::new(VecDeque::from(replies));
        Self::new(move |path, _| {
            replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request {}", path))
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|req| req.path).collect()
    }
}

impl Transport for FakeDevice {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Reply {
        let started = Instant::now();
        let path = url
            .strip_prefix(BASE)
            .map(|path| path.trim_start_matches('/'))
            .unwrap_or(url)
            .to_string();
        let params: HashMap<String, String> = query
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        let reply = (self.handler)(&path, &params);
        self.requests.lock().unwrap().push(Request {
            path,
            params,
            started,
            finished: Instant::now(),
        });
        reply
    }
}

pub fn client(device: &Arc<FakeDevice>) -> FsapiClient<Arc<FakeDevice>> {
    client_with(device, ClientConfig::default().without_cooldowns())
}

pub fn client_with(device: &Arc<FakeDevice>, config: ClientConfig) -> FsapiClient<Arc<FakeDevice>> {
    FsapiClient::with_transport(device.clone(), BASE, PIN, config)
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// replies

pub fn ok(body: impl ToString) -> Reply {
    Ok(HttpResponse {
        status: 200,
        body: body.to_string(),
    })
}

pub fn http(status: u16) -> Reply {
    Ok(HttpResponse {
        status,
        body: String::new(),
    })
}

pub fn fs_status(status: &str) -> Reply {
    ok(format!("<fsapiResponse><status>{}</status></fsapiResponse>", status))
}

pub fn fs_value(tag: &str, value: impl ToString) -> Reply {
    ok(format!(
        "<fsapiResponse><status>FS_OK</status><value><{tag}>{}</{tag}></value></fsapiResponse>",
        value.to_string(),
        tag = tag
    ))
}

pub fn session(sid: &str) -> Reply {
    ok(format!(
        "<fsapiResponse><status>FS_OK</status><sessionId>{}</sessionId></fsapiResponse>",
        sid
    ))
}

/// A LIST_GET_NEXT page with labelled items for `keys`.
pub fn list_page(keys: impl IntoIterator<Item = u32>, end: bool) -> Reply {
    let items: String = keys
        .into_iter()
        .map(|key| {
            format!(
                "<item key=\"{key}\"><field name=\"label\"><c8_array>item {key}</c8_array></field>\
                 <field name=\"type\"><u8>1</u8></field></item>",
                key = key
            )
        })
        .collect();
    let end = if end { "<listend/>" } else { "" };
    ok(format!(
        "<fsapiResponse><status>FS_OK</status>{}{}</fsapiResponse>",
        items, end
    ))
}
