use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_xml_rs::from_str;
use xmltree::Element;

use crate::error::{FsapiError, Result};

// advertisement document served at the device url

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DeviceInfo {
    #[serde(rename = "friendlyName")]
    pub friendly_name: Option<String>,
    pub version: Option<String>,
    pub webfsapi: Option<String>,
}

pub fn parse_device_info(xml: &str) -> Result<DeviceInfo> {
    from_str(xml).map_err(|err| {
        tracing::debug!("cannot parse device info");
        err.into()
    })
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// responses of GET / SET / LIST_GET_NEXT / CREATE_SESSION

/// Status reported by the device in the `<status>` element of every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsStatus {
    Ok,
    ListEnd,
    Fail,
    NodeDoesNotExist,
    NodeBlocked,
    PacketBad,
    Unknown(String),
}

impl FromStr for FsStatus {
    type Err = std::convert::Infallible;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match input {
            "FS_OK" => FsStatus::Ok,
            "FS_LIST_END" => FsStatus::ListEnd,
            "FS_FAIL" => FsStatus::Fail,
            "FS_NODE_DOES_NOT_EXIST" => FsStatus::NodeDoesNotExist,
            "FS_NODE_BLOCKED" => FsStatus::NodeBlocked,
            "FS_PACKET_BAD" => FsStatus::PacketBad,
            other => FsStatus::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for FsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsStatus::Ok => write!(f, "FS_OK"),
            FsStatus::ListEnd => write!(f, "FS_LIST_END"),
            FsStatus::Fail => write!(f, "FS_FAIL"),
            FsStatus::NodeDoesNotExist => write!(f, "FS_NODE_DOES_NOT_EXIST"),
            FsStatus::NodeBlocked => write!(f, "FS_NODE_BLOCKED"),
            FsStatus::PacketBad => write!(f, "FS_PACKET_BAD"),
            FsStatus::Unknown(status) => write!(f, "{}", status),
        }
    }
}

/// A scalar as it travels in call parameters and list fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataItem {
    Text(String),
    Int(i64),
}

impl DataItem {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataItem::Text(text) => Some(text),
            DataItem::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataItem::Int(num) => Some(*num),
            DataItem::Text(_) => None,
        }
    }
}

impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataItem::Text(text) => write!(f, "{}", text),
            DataItem::Int(num) => write!(f, "{}", num),
        }
    }
}

impl From<&str> for DataItem {
    fn from(text: &str) -> Self {
        DataItem::Text(text.to_string())
    }
}

impl From<String> for DataItem {
    fn from(text: String) -> Self {
        DataItem::Text(text)
    }
}

macro_rules! data_item_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for DataItem {
            fn from(num: $ty) -> Self {
                DataItem::Int(num as i64)
            }
        })*
    };
}

data_item_from_int!(u8, u32, i32, i64);

impl From<bool> for DataItem {
    fn from(flag: bool) -> Self {
        encode_bool(flag)
    }
}

/// Typed value containers found below `<value>` in a GET response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    U8,
    U32,
    S32,
}

impl ValueKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ValueKind::Text => "c8_array",
            ValueKind::U8 => "u8",
            ValueKind::U32 => "u32",
            ValueKind::S32 => "s32",
        }
    }
}

pub fn parse_response(xml: &str) -> Result<Element> {
    Element::parse(xml.as_bytes()).map_err(|err| {
        tracing::debug!("cannot parse fsapi response");
        err.into()
    })
}

/// Follows a `/` separated path of child elements below `root` and returns the
/// text of the last one. Empty elements yield `None`.
pub fn unpack_xml(root: &Element, path: &str) -> Option<String> {
    let mut node = root;
    for name in path.split('/') {
        node = node.get_child(name)?;
    }
    node.get_text().map(|text| text.into_owned())
}

pub fn status(doc: &Element) -> Option<FsStatus> {
    unpack_xml(doc, "status").and_then(|status| status.parse().ok())
}

pub fn decode_text(doc: &Element) -> Option<String> {
    unpack_xml(doc, &format!("value/{}", ValueKind::Text.tag()))
}

pub fn decode_number<T>(doc: &Element, kind: ValueKind) -> Result<Option<T>>
where
    T: FromStr,
{
    match unpack_xml(doc, &format!("value/{}", kind.tag())) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            FsapiError::ProtocolError(format!("cannot read {:?} as {}", raw, kind.tag()))
        }),
    }
}

/// Booleans travel as `u8`; anything but 0 is `true`.
pub fn decode_bool(doc: &Element) -> Result<Option<bool>> {
    Ok(decode_number::<u8>(doc, ValueKind::U8)?.map(|val| val != 0))
}

pub fn encode_bool(flag: bool) -> DataItem {
    DataItem::Int(flag as i64)
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// lists

/// One `<item>` of a LIST_GET_NEXT response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub key: String,
    pub fields: HashMap<String, DataItem>,
}

impl ListItem {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(DataItem::as_text)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(DataItem::as_int)
    }
}

const TEXT_TAGS: &[&str] = &["c8_array"];
const INT_TAGS: &[&str] = &["u8", "u16", "u32", "s8", "s16", "s32"];

/// Reads one `<field>`. Fields without a value, with an empty number or with a
/// type we do not decode are absent from the row.
fn parse_field(field: &Element) -> Result<Option<(String, DataItem)>> {
    let name = field
        .attributes
        .get("name")
        .ok_or_else(|| FsapiError::ProtocolError("list field without name".to_string()))?;

    let typed = match field.children.iter().find_map(|node| node.as_element()) {
        Some(typed) => typed,
        None => {
            tracing::trace!("list field {:?} has no value", name);
            return Ok(None);
        }
    };
    let raw = typed.get_text().map(|text| text.into_owned()).unwrap_or_default();

    let value = if TEXT_TAGS.contains(&typed.name.as_str()) {
        DataItem::Text(raw)
    } else if INT_TAGS.contains(&typed.name.as_str()) {
        match raw.trim().parse::<i64>() {
            Ok(num) => DataItem::Int(num),
            Err(_) => {
                tracing::debug!("cannot read {:?} of field {:?}, skipping", raw, name);
                return Ok(None);
            }
        }
    } else {
        tracing::debug!("unsupported field type {:?} of field {:?}, skipping", typed.name, name);
        return Ok(None);
    };

    Ok(Some((name.clone(), value)))
}

/// Parses all `<item>` rows in document order.
pub fn parse_list_items(doc: &Element) -> Result<Vec<ListItem>> {
    doc.children
        .iter()
        .filter_map(|node| node.as_element())
        .filter(|el| el.name == "item")
        .map(|item| {
            let key = item
                .attributes
                .get("key")
                .cloned()
                .ok_or_else(|| FsapiError::ProtocolError("list item without key".to_string()))?;
            let fields = item
                .children
                .iter()
                .filter_map(|node| node.as_element())
                .filter(|el| el.name == "field")
                .filter_map(|field| parse_field(field).transpose())
                .collect::<Result<HashMap<_, _>>>()?;
            Ok(ListItem { key, fields })
        })
        .collect()
}

/// The device marks the final page of a list with an empty `<listend/>`.
pub fn has_list_end(doc: &Element) -> bool {
    doc.get_child("listend").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(xml: &str) -> Element {
        parse_response(xml).unwrap()
    }

    #[test]
    fn parse_device_info() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8"?>
<netRemote>
  <friendlyName>Kitchen Radio</friendlyName>
  <version>ir-mmi-FS2026-0500-0549_V2.12.33c.EX72088-1A12</version>
  <webfsapi>http://192.168.1.20:80/fsapi</webfsapi>
</netRemote>
"##;
        let info = super::parse_device_info(xml).unwrap();
        assert_eq!(info.friendly_name.as_deref(), Some("Kitchen Radio"));
        assert_eq!(info.webfsapi.as_deref(), Some("http://192.168.1.20:80/fsapi"));
    }

    #[test]
    fn parse_status() {
        assert_eq!("FS_OK".parse::<FsStatus>().unwrap(), FsStatus::Ok);
        assert_eq!("FS_LIST_END".parse::<FsStatus>().unwrap(), FsStatus::ListEnd);
        assert_eq!("FS_PACKET_BAD".parse::<FsStatus>().unwrap(), FsStatus::PacketBad);
        assert_eq!(
            "FS_TIMEOUT".parse::<FsStatus>().unwrap(),
            FsStatus::Unknown("FS_TIMEOUT".to_string())
        );
        assert_eq!(FsStatus::NodeBlocked.to_string(), "FS_NODE_BLOCKED");
    }

    #[test]
    fn decode_typed_values() {
        let text = doc("<fsapiResponse><status>FS_OK</status><value><c8_array>Radio 1</c8_array></value></fsapiResponse>");
        assert_eq!(decode_text(&text), Some("Radio 1".to_string()));
        assert_eq!(decode_number::<u8>(&text, ValueKind::U8).unwrap(), None);

        let empty = doc("<fsapiResponse><status>FS_OK</status><value><c8_array></c8_array></value></fsapiResponse>");
        assert_eq!(decode_text(&empty), None);

        let long = doc("<fsapiResponse><status>FS_OK</status><value><u32>241000</u32></value></fsapiResponse>");
        assert_eq!(decode_number::<u32>(&long, ValueKind::U32).unwrap(), Some(241000));

        let signed = doc("<fsapiResponse><status>FS_OK</status><value><s32>-1</s32></value></fsapiResponse>");
        assert_eq!(decode_number::<i32>(&signed, ValueKind::S32).unwrap(), Some(-1));

        let broken = doc("<fsapiResponse><status>FS_OK</status><value><u8>loud</u8></value></fsapiResponse>");
        assert!(matches!(
            decode_number::<u8>(&broken, ValueKind::U8),
            Err(FsapiError::ProtocolError(_))
        ));
    }

    #[test]
    fn bool_travels_as_u8() {
        assert_eq!(encode_bool(true), DataItem::Int(1));
        assert_eq!(encode_bool(false).to_string(), "0");

        let on = doc("<fsapiResponse><status>FS_OK</status><value><u8>1</u8></value></fsapiResponse>");
        assert_eq!(decode_bool(&on).unwrap(), Some(true));
        let off = doc("<fsapiResponse><status>FS_OK</status><value><u8>0</u8></value></fsapiResponse>");
        assert_eq!(decode_bool(&off).unwrap(), Some(false));
    }

    #[test]
    fn parse_list_page() {
        let page = doc(r##"
<fsapiResponse>
  <status>FS_OK</status>
  <item key="0">
    <field name="id"><c8_array>IR</c8_array></field>
    <field name="selectable"><u8>1</u8></field>
    <field name="label"><c8_array>Internet radio</c8_array></field>
  </item>
  <item key="1">
    <field name="id"><c8_array>DAB</c8_array></field>
    <field name="label"><c8_array>DAB</c8_array></field>
  </item>
  <listend/>
</fsapiResponse>"##);

        let items = parse_list_items(&page).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, "0");
        assert_eq!(items[0].text("label"), Some("Internet radio"));
        assert_eq!(items[0].int("selectable"), Some(1));
        assert_eq!(items[1].text("id"), Some("DAB"));
        assert!(has_list_end(&page));
    }

    #[test]
    fn unreadable_fields_are_left_out_of_the_row() {
        let page = doc(r##"
<fsapiResponse>
  <status>FS_OK</status>
  <item key="3">
    <field name="label"><c8_array>Spotify</c8_array></field>
    <field name="modetype"><e8>0</e8></field>
    <field name="selectable"><u8/></field>
    <field name="streamable"></field>
  </item>
</fsapiResponse>"##);

        let items = parse_list_items(&page).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text("label"), Some("Spotify"));
        assert!(!items[0].fields.contains_key("modetype"));
        assert!(!items[0].fields.contains_key("selectable"));
        assert!(!items[0].fields.contains_key("streamable"));
    }

    #[test]
    fn list_item_without_key_is_rejected() {
        let page = doc("<fsapiResponse><status>FS_OK</status><item><field name=\"label\"><c8_array>x</c8_array></field></item></fsapiResponse>");
        assert!(parse_list_items(&page).is_err());
        assert!(!has_list_end(&page));
    }
}
