use async_trait::async_trait;
use aws_sdk_support::config::Region;
use aws_sdk_support::error::DisplayErrorContext;
use thiserror::Error;

use crate::types::{CategoryDescriptor, NewCase, ServiceDescriptor};

#[derive(Debug, Error)]
pub enum SupportError {
    #[error("support API request failed: {0}")]
    Api(String),

    #[error("support API returned no case id")]
    MissingCaseId,
}

/// The AWS Support operations the relay performs.
#[async_trait]
pub trait SupportApi: Send + Sync {
    /// Opens a case and returns its id.
    async fn create_case(&self, case: &NewCase) -> Result<String, SupportError>;

    async fn resolve_case(&self, case_id: &str) -> Result<(), SupportError>;

    /// Services in the order the API lists them.
    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>, SupportError>;
}

pub struct AwsSupportClient {
    client: aws_sdk_support::Client,
}

impl AwsSupportClient {
    pub fn new(client: aws_sdk_support::Client) -> Self {
        Self { client }
    }

    /// Builds a client from the shared AWS config, pinned to `region`.
    pub fn from_shared_config(shared: &aws_config::SdkConfig, region: &str) -> Self {
        let config = aws_sdk_support::config::Builder::from(shared)
            .region(Region::new(region.to_string()))
            .build();
        Self::new(aws_sdk_support::Client::from_conf(config))
    }
}

fn api_error<E>(e: E) -> SupportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SupportError::Api(DisplayErrorContext(&e).to_string())
}

#[async_trait]
impl SupportApi for AwsSupportClient {
    async fn create_case(&self, case: &NewCase) -> Result<String, SupportError> {
        let output = self
            .client
            .create_case()
            .subject(&case.subject)
            .service_code(&case.service_code)
            .category_code(&case.category_code)
            .severity_code(&case.severity_code)
            .communication_body(&case.communication_body)
            .language(&case.language)
            .issue_type(&case.issue_type)
            .send()
            .await
            .map_err(api_error)?;

        output
            .case_id()
            .map(str::to_string)
            .ok_or(SupportError::MissingCaseId)
    }

    async fn resolve_case(&self, case_id: &str) -> Result<(), SupportError> {
        self.client
            .resolve_case()
            .case_id(case_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>, SupportError> {
        let output = self
            .client
            .describe_services()
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .services()
            .iter()
            .map(|service| ServiceDescriptor {
                code: service.code().unwrap_or_default().to_string(),
                name: service.name().unwrap_or_default().to_string(),
                categories: service
                    .categories()
                    .iter()
                    .map(|category| CategoryDescriptor {
                        code: category.code().unwrap_or_default().to_string(),
                        name: category.name().unwrap_or_default().to_string(),
                    })
                    .collect(),
            })
            .collect())
    }
}
