use super::types::{
    normalize_order, ApiConfig, ApiError, Episode, EpisodesResponse, LoginResponse,
    SearchResponse, Series, SeriesResponse,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("tvrn/", env!("CARGO_PKG_VERSION"));

/// Total attempts per logical request, rate-limit retries included
const MAX_ATTEMPTS: u32 = 3;

/// Re-login this close to the token expiry estimate
const AUTH_SAFETY_MARGIN_MINS: i64 = 2;

/// TVDB v4 bearer tokens are valid for roughly a month
const TOKEN_LIFETIME_DAYS: i64 = 30;

/// The surface the planner depends on: the four TVDB operations.
pub trait TvdbClient {
    fn login(&mut self) -> Result<(), ApiError>;
    fn search_series(&mut self, query: &str, lang: &str) -> Result<Vec<Series>, ApiError>;
    fn series(&mut self, id: u32, lang: &str) -> Result<Series, ApiError>;
    fn episodes(
        &mut self,
        id: u32,
        order: &str,
        season: Option<u32>,
        lang: &str,
    ) -> Result<Vec<Episode>, ApiError>;
}

/// A request as handed to the transport, already routed and authorized
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
    pub accept_language: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

/// Narrow seam between the client logic (auth, retry, pagination) and the
/// actual HTTP stack, so the former is testable without a server.
pub(crate) trait Transport {
    fn send(&self, req: &ApiRequest) -> Result<RawResponse, ApiError>;
}

struct ReqwestTransport {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl Transport for ReqwestTransport {
    fn send(&self, req: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), req.path);

        let mut builder = match req.method {
            "POST" => self.http.post(&url),
            _ => self.http.get(&url),
        };
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(lang) = &req.accept_language {
            builder = builder.header(reqwest::header::ACCEPT_LANGUAGE, lang);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text()?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

#[derive(Debug, Clone)]
struct Session {
    token: String,
    expires_at: DateTime<Utc>,
}

/// TVDB v4 client over HTTPS with in-memory session state
pub struct HttpClient {
    config: ApiConfig,
    transport: Box<dyn Transport>,
    session: Option<Session>,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if !config.is_configured() {
            return Err(ApiError::MissingApiKey);
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let transport = Box::new(ReqwestTransport {
            base_url: config.base_url.clone(),
            http,
        });

        Ok(Self {
            config,
            transport,
            session: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_transport(config: ApiConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            session: None,
        }
    }

    fn ensure_session(&mut self) -> Result<String, ApiError> {
        let needs_login = match &self.session {
            Some(s) => {
                Utc::now() >= s.expires_at - ChronoDuration::minutes(AUTH_SAFETY_MARGIN_MINS)
            }
            None => true,
        };
        if needs_login {
            self.login_internal()?;
        }

        self.session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| ApiError::AuthRejected("login produced no session".to_string()))
    }

    fn login_internal(&mut self) -> Result<(), ApiError> {
        if self.config.api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let body = if self.config.pin.is_empty() {
            json!({ "apikey": self.config.api_key })
        } else {
            json!({ "apikey": self.config.api_key, "pin": self.config.pin })
        };

        let response: LoginResponse =
            self.request("POST", "/login", Vec::new(), Some(body), None, false)?;

        if response.data.token.is_empty() {
            return Err(ApiError::AuthRejected("empty token from login".to_string()));
        }

        self.session = Some(Session {
            token: response.data.token,
            expires_at: Utc::now() + ChronoDuration::days(TOKEN_LIFETIME_DAYS),
        });
        debug!("Logged in to TVDB");
        Ok(())
    }

    /// Send a request, retrying on 429 and forcing a single re-login on 401
    fn request<T: DeserializeOwned>(
        &mut self,
        method: &'static str,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
        lang: Option<&str>,
        with_auth: bool,
    ) -> Result<T, ApiError> {
        let mut relogin_done = false;

        for attempt in 1..=MAX_ATTEMPTS {
            let bearer = if with_auth {
                Some(self.ensure_session()?)
            } else {
                None
            };

            let req = ApiRequest {
                method,
                path: path.to_string(),
                query: query.clone(),
                body: body.clone(),
                bearer,
                accept_language: lang.filter(|l| !l.is_empty()).map(|l| l.to_string()),
            };

            let response = self.transport.send(&req)?;

            match response.status {
                429 => {
                    let delay = retry_after_delay(
                        response.retry_after.as_deref(),
                        self.config.rate_limit_backoff,
                    );
                    warn!(
                        "Rate limited on {} {} (attempt {}/{}), waiting {:?}",
                        method, path, attempt, MAX_ATTEMPTS, delay
                    );
                    if attempt < MAX_ATTEMPTS {
                        std::thread::sleep(delay);
                    }
                    continue;
                }
                401 if with_auth && !relogin_done => {
                    debug!("Unauthorized on {} {}, forcing re-login", method, path);
                    relogin_done = true;
                    self.session = None;
                    self.login_internal()?;
                    continue;
                }
                401 => {
                    return Err(ApiError::AuthRejected(format!(
                        "{} {} unauthorized after re-login",
                        method, path
                    )));
                }
                status if (200..300).contains(&status) => {
                    return serde_json::from_str(&response.body)
                        .map_err(|e| ApiError::Decode(e.to_string()));
                }
                status => {
                    return Err(ApiError::Upstream {
                        method,
                        path: path.to_string(),
                        status,
                        message: excerpt(&response.body),
                    });
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }
}

impl TvdbClient for HttpClient {
    fn login(&mut self) -> Result<(), ApiError> {
        self.ensure_session().map(|_| ())
    }

    fn search_series(&mut self, query: &str, lang: &str) -> Result<Vec<Series>, ApiError> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("type".to_string(), "series".to_string()),
        ];

        let response: SearchResponse =
            self.request("GET", "/search", params, None, Some(lang), true)?;

        // The type filter is advisory; drop anything that is not a series
        let hits: Vec<Series> = response
            .data
            .into_iter()
            .filter(|r| r.kind.eq_ignore_ascii_case("series"))
            .map(|r| r.into_series())
            .collect();

        debug!(query = %query, hits = hits.len(), "Series search complete");
        Ok(hits)
    }

    fn series(&mut self, id: u32, lang: &str) -> Result<Series, ApiError> {
        let response: SeriesResponse = self.request(
            "GET",
            &format!("/series/{}", id),
            Vec::new(),
            None,
            Some(lang),
            true,
        )?;
        Ok(response.data.into_series())
    }

    fn episodes(
        &mut self,
        id: u32,
        order: &str,
        season: Option<u32>,
        _lang: &str,
    ) -> Result<Vec<Episode>, ApiError> {
        let order = normalize_order(order);
        let path = format!("/series/{}/episodes/{}", id, order);

        let mut all = Vec::new();
        let mut page: u32 = 0;
        loop {
            let mut params = vec![("page".to_string(), page.to_string())];
            if let Some(s) = season {
                params.push(("season".to_string(), s.to_string()));
            }

            let response: EpisodesResponse =
                self.request("GET", &path, params, None, None, true)?;

            all.extend(response.data.episodes.into_iter().map(|e| e.into_episode()));

            if response.links.next == 0 {
                break;
            }
            page = response.links.next;
        }

        info!(
            series = id,
            order = %order,
            episodes = all.len(),
            "Fetched episode list"
        );
        Ok(all)
    }
}

/// Honor a Retry-After header given as delay seconds or an HTTP date,
/// falling back to `default` otherwise
fn retry_after_delay(header: Option<&str>, default: Duration) -> Duration {
    let Some(raw) = header.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };

    if let Ok(secs) = raw.parse::<u64>() {
        if secs > 0 {
            return Duration::from_secs(secs);
        }
        return default;
    }

    if let Ok(when) = DateTime::parse_from_rfc2822(raw) {
        let until = when.with_timezone(&Utc) - Utc::now();
        if let Ok(d) = until.to_std() {
            return d;
        }
    }

    default
}

fn excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        body.to_string()
    } else {
        let mut end = LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedTransport {
        responses: RefCell<VecDeque<RawResponse>>,
        requests: RefCell<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<RawResponse>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, req: &ApiRequest) -> Result<RawResponse, ApiError> {
            self.requests.borrow_mut().push(req.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Network("script exhausted".to_string()))
        }
    }

    fn ok(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            retry_after: None,
            body: body.to_string(),
        }
    }

    fn status(code: u16) -> RawResponse {
        RawResponse {
            status: code,
            retry_after: None,
            body: String::new(),
        }
    }

    fn login_ok(token: &str) -> RawResponse {
        ok(&format!(r#"{{"data": {{"token": "{}"}}}}"#, token))
    }

    fn test_config() -> ApiConfig {
        let mut config = ApiConfig::new("test-key", "");
        config.rate_limit_backoff = Duration::from_millis(1);
        config
    }

    fn client(responses: Vec<RawResponse>) -> HttpClient {
        HttpClient::with_transport(test_config(), Box::new(ScriptedTransport::new(responses)))
    }

    // Helper to build a client and keep hold of the request log
    fn client_with_log(
        responses: Vec<RawResponse>,
    ) -> (HttpClient, std::rc::Rc<ScriptedTransport>) {
        // Transport must be Box<dyn Transport>; share the log via Rc
        struct Shared(std::rc::Rc<ScriptedTransport>);
        impl Transport for Shared {
            fn send(&self, req: &ApiRequest) -> Result<RawResponse, ApiError> {
                self.0.send(req)
            }
        }

        let inner = std::rc::Rc::new(ScriptedTransport::new(responses));
        let client =
            HttpClient::with_transport(test_config(), Box::new(Shared(inner.clone())));
        (client, inner)
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = HttpClient::new(ApiConfig::default());
        assert!(matches!(result, Err(ApiError::MissingApiKey)));
    }

    #[test]
    fn test_login_stores_session() {
        let mut c = client(vec![login_ok("tok-1")]);
        c.login().unwrap();
        assert_eq!(c.session.as_ref().unwrap().token, "tok-1");

        // A second login reuses the cached token, no further request
        c.login().unwrap();
    }

    #[test]
    fn test_login_empty_token_is_auth_error() {
        let mut c = client(vec![ok(r#"{"data": {"token": ""}}"#)]);
        assert!(matches!(c.login(), Err(ApiError::AuthRejected(_))));
    }

    #[test]
    fn test_search_filters_non_series() {
        let body = r#"{"data": [
            {"tvdb_id": 1, "name": "Firefly", "year": 2002, "slug": "firefly", "type": "series"},
            {"tvdb_id": 2, "name": "Firefly Movie", "year": 2005, "slug": "fm", "type": "movie"}
        ]}"#;
        let (mut c, log) = client_with_log(vec![login_ok("t"), ok(body)]);

        let hits = c.search_series("firefly", "en").unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Firefly");

        let requests = log.requests.borrow();
        assert_eq!(requests[1].path, "/search");
        assert!(requests[1]
            .query
            .contains(&("q".to_string(), "firefly".to_string())));
        assert_eq!(requests[1].bearer.as_deref(), Some("t"));
        assert_eq!(requests[1].accept_language.as_deref(), Some("en"));
    }

    #[test]
    fn test_series_by_id() {
        let body = r#"{"data": {"id": "121361", "name": "Firefly", "year": "2002",
                       "slug": "firefly", "aliases": ["FF"]}}"#;
        let mut c = client(vec![login_ok("t"), ok(body)]);

        let series = c.series(121361, "en").unwrap();

        assert_eq!(series.id, 121361);
        assert_eq!(series.year, 2002);
        assert_eq!(series.aliases, vec!["FF".to_string()]);
    }

    #[test]
    fn test_episodes_follow_pagination_in_order() {
        let page0 = r#"{"data": {"episodes": [
            {"id": 1, "seasonNumber": 1, "number": 1, "name": "Serenity"},
            {"id": 2, "seasonNumber": 1, "number": 2, "name": "The Train Job"}
        ]}, "links": {"next": 1}}"#;
        let page1 = r#"{"data": {"episodes": [
            {"id": 3, "seasonNumber": 1, "number": 3, "name": "Our Mrs. Reynolds"}
        ]}, "links": {"next": 0}}"#;
        let (mut c, log) = client_with_log(vec![login_ok("t"), ok(page0), ok(page1)]);

        let episodes = c.episodes(123, "aired", Some(1), "en").unwrap();

        let numbers: Vec<u32> = episodes.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let requests = log.requests.borrow();
        assert_eq!(requests[1].path, "/series/123/episodes/default");
        assert!(requests[1]
            .query
            .contains(&("page".to_string(), "0".to_string())));
        assert!(requests[1]
            .query
            .contains(&("season".to_string(), "1".to_string())));
        assert!(requests[2]
            .query
            .contains(&("page".to_string(), "1".to_string())));
    }

    #[test]
    fn test_episodes_stop_at_first_cursorless_page() {
        let only = r#"{"data": {"episodes": [
            {"id": 1, "seasonNumber": 2, "number": 1}
        ]}}"#;
        let (mut c, log) = client_with_log(vec![login_ok("t"), ok(only)]);

        let episodes = c.episodes(9, "dvd", None, "en").unwrap();

        assert_eq!(episodes.len(), 1);
        // Login plus exactly one page
        assert_eq!(log.requests.borrow().len(), 2);
    }

    #[test]
    fn test_rate_limit_budget_exhausted() {
        let mut c = client(vec![login_ok("t"), status(429), status(429), status(429)]);

        let result = c.episodes(1, "aired", None, "en");

        assert!(matches!(
            result,
            Err(ApiError::RetriesExhausted { attempts: 3 })
        ));
    }

    #[test]
    fn test_rate_limit_then_success() {
        let body = r#"{"data": {"episodes": []}, "links": {"next": 0}}"#;
        let mut c = client(vec![login_ok("t"), status(429), status(429), ok(body)]);

        let episodes = c.episodes(1, "aired", None, "en").unwrap();
        assert!(episodes.is_empty());
    }

    #[test]
    fn test_unauthorized_triggers_single_relogin() {
        let body = r#"{"data": []}"#;
        let (mut c, log) = client_with_log(vec![
            login_ok("stale"),
            status(401),
            login_ok("fresh"),
            ok(body),
        ]);

        let hits = c.search_series("x", "en").unwrap();
        assert!(hits.is_empty());

        let requests = log.requests.borrow();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[3].bearer.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_second_unauthorized_is_fatal() {
        let mut c = client(vec![login_ok("a"), status(401), login_ok("b"), status(401)]);

        let result = c.search_series("x", "en");
        assert!(matches!(result, Err(ApiError::AuthRejected(_))));
    }

    #[test]
    fn test_non_2xx_is_upstream_error() {
        let mut c = client(vec![login_ok("t"), status(500)]);

        let result = c.search_series("x", "en");
        assert!(matches!(
            result,
            Err(ApiError::Upstream { status: 500, .. })
        ));
    }

    #[test]
    fn test_retry_after_delay_parsing() {
        let default = Duration::from_secs(2);

        assert_eq!(retry_after_delay(None, default), default);
        assert_eq!(retry_after_delay(Some(""), default), default);
        assert_eq!(
            retry_after_delay(Some("5"), default),
            Duration::from_secs(5)
        );
        assert_eq!(retry_after_delay(Some("0"), default), default);
        assert_eq!(retry_after_delay(Some("soon"), default), default);

        // HTTP-date form: a past date falls back to the default
        assert_eq!(
            retry_after_delay(Some("Wed, 21 Oct 2015 07:28:00 GMT"), default),
            default
        );
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert!(short.len() < long.len());
        assert!(short.ends_with("..."));

        assert_eq!(excerpt("short"), "short");
    }
}
