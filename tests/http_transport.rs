use std::time::Duration;

use fsapi::{discover, ClientConfig, FsapiClient, FsapiError, HttpTransport};
use mockito::{Matcher, Server};

fn device_doc(webfsapi: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<netRemote>
  <friendlyName>Living Room</friendlyName>
  <version>ir-mmi-FS2026-0500-0052.V2.5.15</version>
  <webfsapi>{}</webfsapi>
</netRemote>"#,
        webfsapi
    )
}

fn config() -> ClientConfig {
    ClientConfig::default()
        .with_timeout(Duration::from_secs(5))
        .without_cooldowns()
}

#[test]
fn discovers_endpoint_and_reads_values() {
    let mut server = Server::new();
    let webfsapi = format!("{}/fsapi", server.url());

    let device = server
        .mock("GET", "/device")
        .with_status(200)
        .with_body(device_doc(&webfsapi))
        .create();
    let volume = server
        .mock("GET", "/fsapi/GET/netRemote.sys.audio.volume")
        .match_query(Matcher::UrlEncoded("pin".into(), "4711".into()))
        .with_status(200)
        .with_body("<fsapiResponse><status>FS_OK</status><value><u8>11</u8></value></fsapiResponse>")
        .create();

    let client = FsapiClient::connect(&format!("{}/device", server.url()), "4711", config()).unwrap();
    assert_eq!(client.webfsapi(), webfsapi);
    assert_eq!(client.volume().unwrap(), Some(11));

    device.assert();
    volume.assert();
}

#[test]
fn set_sends_value_parameter() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/fsapi/SET/netRemote.sys.info.friendlyName")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("pin".into(), "1234".into()),
            Matcher::UrlEncoded("value".into(), "Küche".into()),
        ]))
        .with_status(200)
        .with_body("<fsapiResponse><status>FS_OK</status></fsapiResponse>")
        .create();

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let client = FsapiClient::with_transport(transport, format!("{}/fsapi/", server.url()), "1234", config());
    assert!(client.set_friendly_name("Küche").unwrap());

    mock.assert();
}

#[test]
fn forbidden_means_wrong_pin() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/fsapi/GET/netRemote.sys.power")
        .match_query(Matcher::Any)
        .with_status(403)
        .expect(1)
        .create();

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let client = FsapiClient::with_transport(transport, format!("{}/fsapi", server.url()), "0000", config());
    assert!(matches!(client.power(), Err(FsapiError::InvalidPin)));

    mock.assert();
}

#[test]
fn rejected_request_is_replayed_with_new_session() {
    let mut server = Server::new();
    let without_sid = server
        .mock("GET", "/fsapi/GET/netRemote.sys.power")
        .match_query(Matcher::Regex("^pin=1234$".into()))
        .with_status(404)
        .expect(1)
        .create();
    let session = server
        .mock("GET", "/fsapi/CREATE_SESSION")
        .match_query(Matcher::Regex("^pin=1234$".into()))
        .with_status(200)
        .with_body("<fsapiResponse><status>FS_OK</status><sessionId>1966331234</sessionId></fsapiResponse>")
        .expect(1)
        .create();
    let with_sid = server
        .mock("GET", "/fsapi/GET/netRemote.sys.power")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("pin".into(), "1234".into()),
            Matcher::UrlEncoded("sid".into(), "1966331234".into()),
        ]))
        .with_status(200)
        .with_body("<fsapiResponse><status>FS_OK</status><value><u8>1</u8></value></fsapiResponse>")
        .expect(2)
        .create();

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let client = FsapiClient::with_transport(transport, format!("{}/fsapi", server.url()), "1234", config());

    assert_eq!(client.power().unwrap(), Some(true));
    assert_eq!(client.session_id().as_deref(), Some("1966331234"));
    assert_eq!(client.power().unwrap(), Some(true));

    without_sid.assert();
    session.assert();
    with_sid.assert();
}

#[test]
fn discovery_without_webfsapi_is_a_protocol_error() {
    let mut server = Server::new();
    server
        .mock("GET", "/device")
        .with_status(200)
        .with_body("<netRemote><friendlyName>Radio</friendlyName></netRemote>")
        .create();

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let err = discover(&transport, &format!("{}/device", server.url())).unwrap_err();
    assert!(matches!(err, FsapiError::ProtocolError(_)), "{:?}", err);
}

#[test]
fn discovery_reports_unexpected_status() {
    let mut server = Server::new();
    server.mock("GET", "/device").with_status(500).create();

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let err = discover(&transport, &format!("{}/device", server.url())).unwrap_err();
    assert!(matches!(err, FsapiError::UnexpectedStatus { status: 500, .. }), "{:?}", err);
}

#[test]
fn refused_connection_is_unreachable() {
    let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
    let err = discover(&transport, "http://127.0.0.1:1/device").unwrap_err();
    assert!(matches!(err, FsapiError::Unreachable(_)), "{:?}", err);

    let client = FsapiClient::with_transport(transport, "http://127.0.0.1:1/fsapi", "1234", config());
    assert!(matches!(client.volume(), Err(FsapiError::Unreachable(_))));
}
