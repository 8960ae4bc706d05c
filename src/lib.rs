//! Library for controlling internet radios and other media receivers that speak
//! the Frontier Silicon "FSAPI" (Medion, Hama, Auna, Roberts, ...).
//!
//! The device is controlled with HTTP GET requests answered with small XML
//! documents. [`FsapiClient`] takes care of the session, retries once with a
//! fresh session when the device forgot it, and keeps calls apart so that slow
//! firmware is not overrun.
//!
//! ## Example
//!
//! ```ignore
//! let client = fsapi::FsapiClient::connect("http://192.168.1.20/device", "1234", Default::default())?;
//!
//! if client.power()? != Some(true) {
//!     client.set_power(true)?;
//! }
//! for mode in client.modes()? {
//!     println!("{} {}", mode.key, mode.label);
//! }
//!
//! // browse folders of the current mode
//! client.nav_select_folder_via_path(&[2, 5])?;
//! for item in client.nav_list()? {
//!     println!("{:?}", item?);
//! }
//! ```

pub(crate) mod api;
pub(crate) mod client;
pub mod config;
pub mod error;
pub(crate) mod fsapi_xml;
pub(crate) mod list;
pub mod models;
pub(crate) mod nav;
mod operations;
pub(crate) mod throttle;

pub use api::{discover, HttpResponse, HttpTransport, Node, Transport, TransportError};
pub use client::{CallOptions, FsapiClient, Response};
pub use config::{ClientConfig, Cooldown};
pub use error::{FsapiError, Result};
pub use fsapi_xml::{DataItem, DeviceInfo, FsStatus, ListItem, ValueKind};
pub use list::ListReader;
pub use models::{Equaliser, PlayControl, PlayState, PlayerMode, Preset};
pub use nav::{NavPath, NavStep};
pub use throttle::Throttle;
