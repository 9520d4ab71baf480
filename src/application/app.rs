//! Pieces shared by carrier and order apps.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::pipeline::{AppContext, MethodContract, WrappedMethod};
use crate::config::SdkConfig;
use crate::domain::foundation::SdkError;
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{ObjectSchema, Schema, StringFormat};
use crate::ports::PluginMethod;

/// Who an app is, as declared at the top of its manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppIdentity {
    id: Uuid,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "websiteURL")]
    website_url: Url,
}

impl AppIdentity {
    pub(super) fn schema_fields() -> ObjectSchema {
        Schema::object()
            .required("id", Schema::uuid())
            .required("name", Schema::text().max_length(100))
            .optional("description", Schema::string().single_line().max_length(1000))
            .required("websiteURL", Schema::string().format(StringFormat::Website))
            .optional("connectionForm", Schema::any())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn website_url(&self) -> &Url {
        &self.website_url
    }
}

/// Seals `registry` and wraps it with the configured defaults.
pub(super) fn seal(mut registry: ReferenceRegistry, config: &SdkConfig) -> Result<Arc<AppContext>, SdkError> {
    let locale = config
        .localization
        .default_locale_tag()
        .map_err(|e| SdkError::invalid(e.to_string()))?;
    let currency = config
        .money
        .default_currency_code()
        .map_err(|e| SdkError::invalid(e.to_string()))?;

    registry.finish_loading();
    Ok(Arc::new(AppContext::new(Arc::new(registry), locale, currency)))
}

/// A plugin method an app definition may or may not supply.
pub(super) type Plugin<M> = Option<Arc<dyn PluginMethod<<M as MethodContract>::Args>>>;

pub(super) fn wrap<M: MethodContract>(plugin: Plugin<M>, context: &Arc<AppContext>) -> Option<WrappedMethod<M>> {
    plugin.map(|plugin| WrappedMethod::new(plugin, context.clone()))
}
