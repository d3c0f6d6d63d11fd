use tracing::{debug, instrument};

use super::{xml_helpers, Session, SoapPartnerClient};
use crate::error::Result;
use crate::security::xml;
use crate::types::LoginResult;

impl SoapPartnerClient {
    /// Log in with a username and password (with the security token appended, if any).
    ///
    /// On success the client points at the returned server URL and every later
    /// call carries the session id. A password-expired login still opens the
    /// session; callers decide whether that is acceptable.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginResult> {
        let body = format!(
            "<urn:login><urn:username>{}</urn:username><urn:password>{}</urn:password></urn:login>",
            xml::escape(username),
            xml::escape(password),
        );
        let envelope = Self::envelope(None, &body);

        let response = self
            .post_envelope(&self.login_endpoint(), "login", envelope)
            .await?;
        let result = xml_helpers::parse_login_result(&response)?;
        url::Url::parse(&result.server_url)?;

        debug!(server_url = %result.server_url, password_expired = result.password_expired, "Logged in");
        self.session = Some(Session {
            server_url: result.server_url.clone(),
            session_id: result.session_id.clone(),
        });

        Ok(result)
    }

    /// Log out of the current session.
    ///
    /// The session is dropped locally even when the remote call fails.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<()> {
        let session = self.session()?.clone();
        self.session = None;

        let envelope = Self::envelope(Some(&session.session_id), "<urn:logout/>");
        self.post_envelope(&session.server_url, "logout", envelope)
            .await?;

        debug!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn login_response(server_url: &str, expired: bool) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com">
<soapenv:Body><loginResponse><result>
<passwordExpired>{expired}</passwordExpired>
<serverUrl>{server_url}</serverUrl>
<sessionId>00Dxx!session</sessionId>
<userInfo><userName>me@example.com</userName></userInfo>
</result></loginResponse></soapenv:Body></soapenv:Envelope>"#
        )
    }

    #[tokio::test]
    async fn test_login_sets_session() {
        let mock_server = MockServer::start().await;
        let server_url = format!("{}/services/Soap/u/62.0/00Dxx", mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/services/Soap/u/62.0"))
            .and(header("soapaction", "login"))
            .and(body_string_contains("<urn:username>me@example.com</urn:username>"))
            .and(body_string_contains("<urn:password>pw&amp;token</urn:password>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(login_response(&server_url, false)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = SoapPartnerClient::new(mock_server.uri());
        let result = client.login("me@example.com", "pw&token").await.unwrap();

        assert_eq!(result.server_url, server_url);
        assert!(!result.password_expired);
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_fault() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/Soap/u/62.0"))
            .respond_with(ResponseTemplate::new(500).set_body_string(
                r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><soapenv:Fault><faultcode>INVALID_LOGIN</faultcode><faultstring>INVALID_LOGIN: Invalid username, password, security token; or user locked out.</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#,
            ))
            .mount(&mock_server)
            .await;

        let mut client = SoapPartnerClient::new(mock_server.uri());
        let err = client.login("me@example.com", "wrong").await.unwrap_err();

        let (code, message) = err.fault().unwrap();
        assert_eq!(code, "INVALID_LOGIN");
        assert!(message.contains("locked out"));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_on_failure() {
        let mock_server = MockServer::start().await;
        let server_url = format!("{}/services/Soap/u/62.0/00Dxx", mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/services/Soap/u/62.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(login_response(&server_url, false)))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/services/Soap/u/62.0/00Dxx"))
            .and(header("soapaction", "logout"))
            .and(body_string_contains("<urn:sessionId>00Dxx!session</urn:sessionId>"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = SoapPartnerClient::new(mock_server.uri());
        client.login("me@example.com", "pw").await.unwrap();

        let err = client.logout().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Http(_)));
        assert!(!client.is_logged_in());

        let err = client.logout().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NotLoggedIn));
    }
}
