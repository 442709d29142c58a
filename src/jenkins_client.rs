//! Jenkins REST client
//!
//! Thin async wrapper over the Jenkins JSON API. Each method is a single
//! authenticated round-trip; non-2xx responses become [`JenkinsError::Api`].
//! Jobs nested in folders are addressed as `job/<a>/job/<b>`.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LOCATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{JenkinsError, Result};

/// Path segment Jenkins puts in front of every job or folder name
pub const JOB_SEGMENT: &str = "job";

/// Symbolic reference to the most recent build
pub const LAST_BUILD: &str = "lastBuild";

/// Tree filter selecting parameter definitions from a job
const PARAM_DEFINITIONS_TREE: &str =
    "property[parameterDefinitions[name,type,description,defaultParameterValue[name,value],choices]]";

/// Tree filter selecting recorded parameter values from a build
const BUILD_PARAMETERS_TREE: &str = "actions[parameters[name,value]]";

/// Resolve a slash-separated job name into its URL path.
///
/// `folder/my job` becomes `job/folder/job/my%20job`. Each segment is
/// percent-encoded on its own. An empty name yields `job/`, which Jenkins
/// answers with a 404.
pub fn job_path(job: &str) -> String {
    job.split('/')
        .map(|segment| format!("{}/{}", JOB_SEGMENT, urlencoding::encode(segment)))
        .collect::<Vec<_>>()
        .join("/")
}

/// Pull the queue item id out of a `.../queue/item/<id>/` location
pub fn queue_id_from_location(location: &str) -> Option<&str> {
    let (_, id) = location.trim_end_matches('/').rsplit_once("queue/item/")?;
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}

// ============================================================================
// Partial response schemas
// ============================================================================

#[derive(Debug, Deserialize)]
struct JobProperties {
    #[serde(default)]
    property: Option<Vec<Option<JobProperty>>>,
}

#[derive(Debug, Deserialize)]
struct JobProperty {
    #[serde(default, rename = "parameterDefinitions")]
    parameter_definitions: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct BuildActions {
    #[serde(default)]
    actions: Option<Vec<Option<BuildAction>>>,
}

#[derive(Debug, Deserialize)]
struct BuildAction {
    #[serde(default)]
    parameters: Option<Vec<Option<ParameterValue>>>,
}

#[derive(Debug, Deserialize)]
struct ParameterValue {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<Value>,
}

impl JobProperties {
    /// Flatten every property's definitions into one ordered list
    fn into_definitions(self) -> Vec<Value> {
        self.property
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .flat_map(|p| p.parameter_definitions.unwrap_or_default())
            .collect()
    }
}

impl BuildActions {
    /// Collect named parameters with a non-null value, rendered as strings
    fn into_parameters(self) -> BTreeMap<String, String> {
        self.actions
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .flat_map(|a| a.parameters.unwrap_or_default())
            .flatten()
            .filter_map(|p| {
                let name = p.name?;
                let value = match p.value? {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((name, value))
            })
            .collect()
    }
}

// ============================================================================
// Client
// ============================================================================

/// Authenticated client for one Jenkins server
#[derive(Clone)]
pub struct JenkinsClient {
    http: reqwest::Client,
    base_url: String,
}

impl JenkinsClient {
    /// Build a client whose every request carries Basic auth for the configured user
    pub fn new(config: &Config) -> Result<Self> {
        let credentials = BASE64.encode(format!("{}:{}", config.username, config.api_token));
        let mut auth = HeaderValue::from_str(&format!("Basic {}", credentials))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    /// Send a request and turn any non-2xx status into an API error
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Jenkins returned {} for {}", status, body.lines().next().unwrap_or(""));
        Err(JenkinsError::api(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, tree: Option<&str>) -> Result<T> {
        let mut request = self.request(Method::GET, path);
        if let Some(tree) = tree {
            request = request.query(&[("tree", tree)]);
        }
        let body = self.send(request).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a build trigger and return the queue location, if Jenkins sent one
    async fn post_trigger(&self, request: RequestBuilder) -> Result<Option<String>> {
        let response = self.send(request).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if location.is_none() {
            warn!("Build trigger response carried no Location header");
        }
        Ok(location)
    }

    /// `GET <job>/api/json`
    pub async fn job_info(&self, job: &str, tree: Option<&str>) -> Result<Value> {
        self.get_json(&format!("{}/api/json", job_path(job)), tree).await
    }

    /// `GET <job>/<build>/api/json`
    pub async fn build_info(&self, job: &str, build_ref: &str, tree: Option<&str>) -> Result<Value> {
        self.get_json(&format!("{}/{}/api/json", job_path(job), build_ref), tree).await
    }

    /// Parameter definitions of a job, flattened across its properties
    pub async fn parameter_definitions(&self, job: &str) -> Result<Vec<Value>> {
        let props: JobProperties = self
            .get_json(&format!("{}/api/json", job_path(job)), Some(PARAM_DEFINITIONS_TREE))
            .await?;
        Ok(props.into_definitions())
    }

    /// Raw console log of a build
    pub async fn console_text(&self, job: &str, build_ref: &str) -> Result<String> {
        let request = self.request(Method::GET, &format!("{}/{}/consoleText", job_path(job), build_ref));
        Ok(self.send(request).await?.text().await?)
    }

    /// Parameter values recorded on a finished build
    pub async fn build_parameters(&self, job: &str, build_number: u64) -> Result<BTreeMap<String, String>> {
        let actions: BuildActions = self
            .get_json(
                &format!("{}/{}/api/json", job_path(job), build_number),
                Some(BUILD_PARAMETERS_TREE),
            )
            .await?;
        Ok(actions.into_parameters())
    }

    /// `POST <job>/build`
    pub async fn trigger_build(&self, job: &str) -> Result<Option<String>> {
        let request = self.request(Method::POST, &format!("{}/build", job_path(job)));
        self.post_trigger(request).await
    }

    /// `POST <job>/buildWithParameters` with a form-encoded body
    pub async fn trigger_build_with_params(
        &self,
        job: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Option<String>> {
        let request = self
            .request(Method::POST, &format!("{}/buildWithParameters", job_path(job)))
            .form(params);
        self.post_trigger(request).await
    }

    /// `GET queue/item/<id>/api/json`
    pub async fn queue_item(&self, queue_id: &str) -> Result<Value> {
        self.get_json(&format!("queue/item/{}/api/json", queue_id), None).await
    }
}
