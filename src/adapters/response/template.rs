//! Template Responder - serves the fixed template texts directly.
//!
//! Used when no generation collaborator is configured; the broker gets
//! the same deterministic strings the fallbacks guarantee.

use async_trait::async_trait;

use crate::domain::capture::CaptureRecord;
use crate::ports::{ResponseError, ResponseGenerator, ResponseTemplate};

#[derive(Debug, Clone, Default)]
pub struct TemplateResponder;

impl TemplateResponder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResponseGenerator for TemplateResponder {
    async fn generate(
        &self,
        template: ResponseTemplate,
        record: &CaptureRecord,
    ) -> Result<String, ResponseError> {
        Ok(template.fallback(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{BrokerId, ChannelAddress};

    #[tokio::test]
    async fn serves_the_template_fallback() {
        let record = CaptureRecord::new(
            BrokerId::new("b1").unwrap(),
            ChannelAddress::new("569").unwrap(),
        );

        let text = TemplateResponder::new()
            .generate(ResponseTemplate::CaptureComplete, &record)
            .await
            .unwrap();

        assert_eq!(text, ResponseTemplate::CaptureComplete.fallback(&record));
    }
}
