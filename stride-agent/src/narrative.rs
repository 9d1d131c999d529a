// stride-agent/src/narrative.rs
// AI-generated threat narratives with a local simulated fallback

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use stride_core::Component;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),

    #[error("API key not provided for provider {0}")]
    MissingApiKey(Provider),

    #[error("HTTP request to {provider} failed: {source}")]
    Http {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("Malformed {provider} response: {reason}")]
    MalformedResponse { provider: Provider, reason: String },
}

impl NarrativeError {
    /// Failures that may succeed on a later attempt with the same configuration
    pub fn is_transient(&self) -> bool {
        match self {
            NarrativeError::Http { source, .. } => source.is_timeout() || source.is_connect(),
            NarrativeError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Local,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// Hosted provider behind this name; `None` for the local simulator
    pub fn remote(self) -> Option<RemoteProvider> {
        match self {
            Provider::Local => None,
            Provider::Anthropic => Some(RemoteProvider::Anthropic),
            Provider::OpenAi => Some(RemoteProvider::OpenAi),
            Provider::Gemini => Some(RemoteProvider::Gemini),
        }
    }
}

/// Providers reached over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteProvider {
    Anthropic,
    OpenAi,
    Gemini,
}

impl From<RemoteProvider> for Provider {
    fn from(remote: RemoteProvider) -> Self {
        match remote {
            RemoteProvider::Anthropic => Provider::Anthropic,
            RemoteProvider::OpenAi => Provider::OpenAi,
            RemoteProvider::Gemini => Provider::Gemini,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = NarrativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Provider::Local),
            "anthropic" => Ok(Provider::Anthropic),
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            other => Err(NarrativeError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Provider selection and credentials, passed explicitly on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub enabled: bool,
    /// Kept as text so an unknown name surfaces as `UnsupportedProvider` at request time
    pub provider: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub anthropic_endpoint: String,
    pub anthropic_model: String,
    pub openai_endpoint: String,
    pub openai_model: String,
    pub gemini_endpoint: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "local".to_string(),
            api_key: None,
            timeout_secs: 30,
            max_tokens: 4000,
            anthropic_endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            anthropic_model: "claude-3-sonnet-20240229".to_string(),
            openai_endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            openai_model: "gpt-4".to_string(),
            gemini_endpoint:
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Narrative in the `{content: [{type, text}]}` shape shared by every provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub content: Vec<ContentBlock>,
}

impl Narrative {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock {
                kind: "text".to_string(),
                text: text.into(),
            }],
        }
    }
}

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    fn provider(&self) -> Provider;

    async fn narrate(&self, component: &Component, prompt: &str) -> Result<Narrative, NarrativeError>;
}

/// Returns a narrative, falling back to the simulated one on any provider failure.
pub async fn request_narrative(component: &Component, config: &NarrativeConfig) -> Narrative {
    match try_request_narrative(component, config).await {
        Ok(narrative) => narrative,
        Err(e) => {
            warn!(
                transient = e.is_transient(),
                "Narrative provider failed, using simulated narrative: {}", e
            );
            simulate_narrative(component)
        }
    }
}

/// Same as [`request_narrative`] but reports the failure instead of recovering.
pub async fn try_request_narrative(
    component: &Component,
    config: &NarrativeConfig,
) -> Result<Narrative, NarrativeError> {
    let provider: Provider = config.provider.parse()?;
    let backend = provider_for(provider, config)?;
    info!("Using AI provider: {}", backend.provider());

    let prompt = build_prompt(component);
    backend.narrate(component, &prompt).await
}

fn provider_for(
    provider: Provider,
    config: &NarrativeConfig,
) -> Result<Box<dyn NarrativeProvider>, NarrativeError> {
    let remote = match provider.remote() {
        Some(remote) => remote,
        None => return Ok(Box::new(LocalSimulator)),
    };

    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(NarrativeError::MissingApiKey(provider))?
        .to_string();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|source| NarrativeError::Http { provider, source })?;

    Ok(Box::new(HttpProvider {
        remote,
        client,
        api_key,
        config: config.clone(),
    }))
}

pub fn build_prompt(component: &Component) -> String {
    let (name, component_type, description) = narrative_subject(component);
    format!(
        "Analise o seguinte componente para potenciais ameaças de segurança usando a metodologia STRIDE:\n\n\
         Componente: {}\n\
         Tipo: {}\n\
         Descrição: {}\n\n\
         Forneça uma análise detalhada considerando:\n\
         1. Cada categoria STRIDE (Spoofing, Tampering, Repudiation, Information Disclosure, Denial of Service, Elevation of Privilege)\n\
         2. Para cada categoria, indique o nível de risco (Alto, Médio, Baixo) baseado nas informações disponíveis\n\
         3. Forneça sugestões específicas de mitigação para cada ameaça\n\
         4. Liste os CAPECs (Common Attack Pattern Enumeration and Classification) relacionados a cada ameaça\n\n\
         Responda em formato estruturado para facilitar o processamento.",
        name, component_type, description
    )
}

fn narrative_subject(component: &Component) -> (&str, &str, &str) {
    (
        component.label_text().filter(|s| !s.is_empty()).unwrap_or("Processo"),
        component
            .component_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("tm.Process"),
        component.description().filter(|s| !s.is_empty()).unwrap_or("Sem descrição"),
    )
}

/// Offline narrative used for the `local` provider and as the failure fallback
pub fn simulate_narrative(component: &Component) -> Narrative {
    let (name, component_type, _) = narrative_subject(component);

    let dos_risk = if name.contains("ALB")
        || name.contains("Load Balancer")
        || component_type.contains("Boundary")
    {
        "Alto"
    } else {
        "Médio"
    };

    Narrative::text(format!(
        "Análise de ameaças para o componente {name} ({component_type}):\n\n\
         **Spoofing**: Este componente pode ser vulnerável a ataques de spoofing se não implementar autenticação adequada. (Risco: Médio)\n\
         Mitigação: Implementar autenticação forte, como OAuth 2.0 ou certificados SSL/TLS.\n\n\
         **Tampering**: Dados podem ser modificados durante a transmissão se não forem protegidos. (Risco: Médio)\n\
         Mitigação: Utilizar HTTPS para todas as comunicações e implementar assinaturas digitais.\n\n\
         **Repudiation**: Sem registro de auditoria adequado, ações podem ser negadas. (Risco: Médio)\n\
         Mitigação: Implementar logs detalhados e armazená-los de forma segura.\n\n\
         **Information Disclosure**: Informações sensíveis podem vazar se não forem criptografadas. (Risco: Alto)\n\
         Mitigação: Criptografar dados sensíveis e implementar controles de acesso adequados.\n\n\
         **Denial of Service**: O componente pode ser sobrecarregado por múltiplas requisições. (Risco: {dos_risk})\n\
         Mitigação: Implementar rate limiting, escalabilidade automática e proteção contra DDoS.\n\n\
         **Elevation of Privilege**: Acesso não autorizado pode ocorrer se os controles de acesso forem fracos. (Risco: Médio)\n\
         Mitigação: Implementar o princípio do menor privilégio e validar todas as entradas.\n\n\
         CAPECs Relacionados:\n\
         - CAPEC-31: Acessar/Interceptar/Modificar Parâmetros HTTP\n\
         - CAPEC-66: SQL Injection\n\
         - CAPEC-212: Exploração de Autenticação"
    ))
}

pub struct LocalSimulator;

#[async_trait]
impl NarrativeProvider for LocalSimulator {
    fn provider(&self) -> Provider {
        Provider::Local
    }

    async fn narrate(&self, component: &Component, _prompt: &str) -> Result<Narrative, NarrativeError> {
        debug!("Simulating narrative for component {:?}", component.id);
        Ok(simulate_narrative(component))
    }
}

/// Remote chat/completion API for one of the hosted providers
pub struct HttpProvider {
    remote: RemoteProvider,
    client: reqwest::Client,
    api_key: String,
    config: NarrativeConfig,
}

impl HttpProvider {
    fn request(&self, prompt: &str) -> reqwest::RequestBuilder {
        match self.remote {
            RemoteProvider::Anthropic => self
                .client
                .post(&self.config.anthropic_endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .json(&json!({
                    "model": self.config.anthropic_model,
                    "max_tokens": self.config.max_tokens,
                    "messages": [{"role": "user", "content": prompt}],
                })),
            RemoteProvider::OpenAi => self
                .client
                .post(&self.config.openai_endpoint)
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "model": self.config.openai_model,
                    "max_tokens": self.config.max_tokens,
                    "messages": [
                        {"role": "system", "content": "Você é um especialista em segurança da informação especializado em modelagem de ameaças."},
                        {"role": "user", "content": prompt}
                    ],
                })),
            RemoteProvider::Gemini => self
                .client
                .post(&self.config.gemini_endpoint)
                .query(&[("key", self.api_key.as_str())])
                .json(&json!({
                    "contents": [{"parts": [{"text": prompt}]}],
                })),
        }
    }
}

#[async_trait]
impl NarrativeProvider for HttpProvider {
    fn provider(&self) -> Provider {
        self.remote.into()
    }

    async fn narrate(&self, component: &Component, prompt: &str) -> Result<Narrative, NarrativeError> {
        let provider = self.provider();
        debug!("Requesting {} narrative for component {:?}", provider, component.id);

        let response = self
            .request(prompt)
            .send()
            .await
            .map_err(|source| NarrativeError::Http { provider, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Status {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|source| NarrativeError::Http { provider, source })?;

        parse_response(provider, &body)
    }
}

/// Extracts the generated text from a provider reply
pub fn parse_response(provider: Provider, body: &Value) -> Result<Narrative, NarrativeError> {
    let malformed = |reason: &str| NarrativeError::MalformedResponse {
        provider,
        reason: reason.to_string(),
    };

    match provider {
        Provider::Anthropic => {
            let narrative: Narrative = serde_json::from_value(body.clone())
                .map_err(|e| malformed(&e.to_string()))?;
            if narrative.content.is_empty() {
                return Err(malformed("empty content"));
            }
            Ok(narrative)
        }
        Provider::OpenAi => body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(Narrative::text)
            .ok_or_else(|| malformed("missing choices[0].message.content")),
        Provider::Gemini => body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(Narrative::text)
            .ok_or_else(|| malformed("missing candidates[0].content.parts[0].text")),
        Provider::Local => Err(malformed("local provider has no remote response")),
    }
}
