//! End-to-end tests of the metadata adapter against a mocked Partner API.

use busbar_sf_sync::metadata::{
    ConverterKind, Endpoint, ErrorKind, CONTENT_DOCUMENT, CONTENT_VERSION, CONTENT_WORKSPACE,
};
use busbar_sf_sync::{AdapterConfiguration, ConverterRegistry, FieldValue, MetadataAdapter};
use chrono::{TimeZone, Utc};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION_PATH: &str = "/services/Soap/u/62.0/00Dxx";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com" xmlns:sf="urn:sobject.partner.soap.sforce.com" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<soapenv:Body>{body}</soapenv:Body></soapenv:Envelope>"#
    )
}

fn fault(code: &str, message: &str) -> String {
    envelope(&format!(
        "<soapenv:Fault><faultcode>{code}</faultcode><faultstring>{message}</faultstring></soapenv:Fault>"
    ))
}

fn field(name: &str, ty: &str, extra: &str) -> String {
    format!("<fields><name>{name}</name><type>{ty}</type>{extra}</fields>")
}

fn sobject(name: &str, fields: &[String]) -> String {
    format!(
        "<result><custom>false</custom>{}<name>{name}</name></result>",
        fields.concat()
    )
}

/// Mount login, describeGlobal, query and logout for a small org.
async fn mount_org(server: &MockServer, logout_calls: u64) {
    let server_url = format!("{}{}", server.uri(), SESSION_PATH);

    Mock::given(method("POST"))
        .and(path("/services/Soap/u/62.0"))
        .and(header("soapaction", "login"))
        .and(body_string_contains("<urn:password>pwTOKEN</urn:password>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(&format!(
            "<loginResponse><result><passwordExpired>false</passwordExpired>\
             <serverUrl>{server_url}</serverUrl><sessionId>00Dxx!session</sessionId>\
             <userInfo><userName>me@example.com</userName></userInfo></result></loginResponse>"
        ))))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("soapaction", "describeGlobal"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(&format!(
            "<describeGlobalResponse><result>\
             <sobjects><name>Account</name></sobjects>\
             <sobjects><name>{CONTENT_WORKSPACE}</name></sobjects>\
             <sobjects><name>{CONTENT_DOCUMENT}</name></sobjects>\
             <sobjects><name>{CONTENT_VERSION}</name></sobjects>\
             </result></describeGlobalResponse>"
        ))))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("soapaction", "query"))
        .and(body_string_contains("SELECT Id, Name FROM ContentWorkspace"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<queryResponse><result><done>true</done>\
             <records><sf:type>ContentWorkspace</sf:type><sf:Id>058A</sf:Id><sf:Id>058A</sf:Id><sf:Name>Marketing</sf:Name></records>\
             <records><sf:type>ContentWorkspace</sf:type><sf:Id>058B</sf:Id><sf:Id>058B</sf:Id><sf:Name>Account</sf:Name></records>\
             <size>2</size></result></queryResponse>",
        )))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("soapaction", "logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope("<logoutResponse/>")))
        .expect(logout_calls)
        .mount(server)
        .await;
}

fn adapter(server: &MockServer) -> MetadataAdapter {
    let config = AdapterConfiguration::new(format!(
        "User=me@example.com;Password=pw;Token=TOKEN;Url={};Timeout=5",
        server.uri()
    ))
    .unwrap();
    MetadataAdapter::new(config).unwrap()
}

#[tokio::test]
async fn test_list_names() {
    init_tracing();
    let server = MockServer::start().await;
    mount_org(&server, 1).await;

    let mut adapter = adapter(&server);
    let names = adapter.list_names().await.unwrap();

    assert_eq!(
        names,
        vec![
            "Account",
            CONTENT_WORKSPACE,
            CONTENT_DOCUMENT,
            CONTENT_VERSION,
            "Marketing"
        ]
    );
    let libraries = adapter.libraries().unwrap();
    assert_eq!(libraries[0].id.as_deref(), Some("058A"));
}

#[tokio::test]
async fn test_describe_object_and_library() {
    init_tracing();
    let server = MockServer::start().await;
    mount_org(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("soapaction", "describeSObjects"))
        .and(body_string_contains("<urn:sObjectType>Account</urn:sObjectType>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(&format!(
            "<describeSObjectsResponse>{}</describeSObjectsResponse>",
            sobject(
                "Account",
                &[
                    field("Id", "id", "<length>18</length>"),
                    field("OwnerId", "reference", ""),
                    field(
                        "Name",
                        "string",
                        "<createable>true</createable><updateable>true</updateable><length>255</length>"
                    ),
                    field("Rating", "picklist", "<nillable>true</nillable>"),
                    field(
                        "Number__c",
                        "string",
                        "<custom>true</custom><externalId>true</externalId>"
                    ),
                    field("SLAExpirationDate__c", "date", "<custom>true</custom>"),
                    field("SystemModstamp", "datetime", ""),
                ]
            )
        ))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("soapaction", "describeSObjects"))
        .and(body_string_contains("<urn:sObjectType>ContentDocument</urn:sObjectType>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(&format!(
            "<describeSObjectsResponse>{}{}</describeSObjectsResponse>",
            sobject(
                CONTENT_DOCUMENT,
                &[
                    field("Id", "id", ""),
                    field("Title", "string", "<length>255</length>"),
                    field("ParentId", "reference", ""),
                    field("Description", "textarea", ""),
                ]
            ),
            sobject(
                CONTENT_VERSION,
                &[
                    field("Id", "id", ""),
                    field("Title", "string", "<createable>true</createable><updateable>true</updateable>"),
                    field("VersionData", "base64", "<createable>true</createable>"),
                    field("ContentSize", "int", ""),
                    field("IsLatest", "boolean", ""),
                    field("Region__c", "multipicklist", "<custom>true</custom>"),
                ]
            )
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let mut adapter = adapter(&server);
    let lists = adapter.describe(&["Marketing", "Account"]).await.unwrap();
    assert_eq!(lists.len(), 2);

    let account = &lists[0];
    assert_eq!(account.name, "Account");
    assert_eq!(
        account.field_names().collect::<Vec<_>>(),
        vec!["Id", "Name", "Rating", "Number__c", "SLAExpirationDate__c", "SystemModstamp"]
    );
    assert_eq!(account.identity_field.as_deref(), Some("Id"));
    assert_eq!(account.correlation_fields, vec!["Id", "Number__c"]);
    assert!(account.field("SystemModstamp").unwrap().concurrency_control);
    assert!(account.field("Id").unwrap().read_only);
    assert!(!account.field("Name").unwrap().read_only);
    assert_eq!(account.field("Name").unwrap().length, 255);

    let marketing = &lists[1];
    assert_eq!(marketing.name, "Marketing");
    assert_eq!(
        marketing.field_names().collect::<Vec<_>>(),
        vec![
            "Id",
            "Description",
            "Title",
            "VersionData",
            "ContentSize",
            "Region__c"
        ]
    );
    assert_eq!(marketing.field("VersionData").unwrap().length, -1);
    assert!(marketing.field("ContentSize").unwrap().backend_computed);
    assert!(!marketing.field("Title").unwrap().read_only);

    let discovered = &adapter.config().discovered;
    assert_eq!(discovered["Marketing"].library_id.as_deref(), Some("058A"));
    let json = serde_json::to_value(adapter.config()).unwrap();
    assert_eq!(json["discovered"]["Account"]["sourceObjects"][0], "Account");
}

#[tokio::test]
async fn test_proposed_converters_convert_values() {
    init_tracing();
    let server = MockServer::start().await;
    mount_org(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("soapaction", "describeSObjects"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(&format!(
            "<describeSObjectsResponse>{}</describeSObjectsResponse>",
            sobject(
                "Account",
                &[
                    field("Id", "id", ""),
                    field("Regions__c", "multipicklist", "<custom>true</custom>"),
                    field("Signed__c", "date", "<custom>true</custom>"),
                ]
            )
        ))))
        .mount(&server)
        .await;

    let mut adapter = adapter(&server);
    let lists = adapter.describe(&["Account"]).await.unwrap();
    let registry = ConverterRegistry::new();

    let regions = lists[0].field("Regions__c").unwrap();
    let config = regions.proposed_converter.as_ref().unwrap();
    assert_eq!(config.kind, ConverterKind::Picklist);
    let converter = registry.create(config).unwrap();
    assert_eq!(
        converter.convert(
            Endpoint::Salesforce,
            Endpoint::Cms,
            Some(&FieldValue::from("EMEA;;APAC"))
        ),
        Some(FieldValue::StringList(vec!["EMEA".into(), "APAC".into()]))
    );

    let signed = lists[0].field("Signed__c").unwrap();
    let converter = registry
        .create(signed.proposed_converter.as_ref().unwrap())
        .unwrap();
    assert_eq!(
        converter.convert(
            Endpoint::Salesforce,
            Endpoint::Cms,
            Some(&FieldValue::from("2024-03-15T10:30:00"))
        ),
        Some(FieldValue::UtcDateTime(
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        ))
    );
}

#[tokio::test]
async fn test_describe_fault_still_logs_out() {
    init_tracing();
    let server = MockServer::start().await;
    mount_org(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("soapaction", "describeSObjects"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(fault("sf:INVALID_TYPE", "sObject type is not supported")),
        )
        .mount(&server)
        .await;

    let mut adapter = adapter(&server);
    let err = adapter.describe(&["Account"]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Salesforce metadata error sf:INVALID_TYPE sObject type is not supported"
    );
}

#[tokio::test]
async fn test_rejected_login() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/Soap/u/62.0"))
        .respond_with(ResponseTemplate::new(500).set_body_string(fault(
            "INVALID_LOGIN",
            "Invalid username, password, security token; or user locked out.",
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut adapter = adapter(&server);
    let err = adapter.list_names().await.unwrap_err();
    assert!(err.is_authentication());
    assert!(matches!(err.kind, ErrorKind::Authentication(_)));
    assert!(err
        .to_string()
        .starts_with("Salesforce login error INVALID_LOGIN"));
}
