use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::EmailTemplate;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTemplateRequest {
    pub subject: String,
    pub body_html: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TemplateList {
    #[schema(value_type = Vec<EmailTemplate>)]
    pub items: Vec<EmailTemplate>,
}
