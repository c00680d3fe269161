// MetricsApi over the AWS SDK CloudWatch client

use async_trait::async_trait;
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{self as cw, DimensionFilter};

use super::{MetricsApi, StatisticsQuery};
use crate::error::MetricError;
use crate::models::Dimension;

pub struct CloudWatchRepo {
    client: Client,
}

impl CloudWatchRepo {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl MetricsApi for CloudWatchRepo {
    async fn statistics(&self, query: &StatisticsQuery<'_>) -> Result<Vec<f64>, MetricError> {
        let period = sdk_period(query.period_secs)?;
        let output = self
            .client
            .get_metric_statistics()
            .namespace(query.namespace)
            .metric_name(query.metric_name)
            .set_dimensions(Some(query.dimensions.iter().map(to_sdk_dimension).collect()))
            .start_time(DateTime::from_secs(query.start_epoch_secs))
            .end_time(DateTime::from_secs(query.end_epoch_secs))
            .period(period)
            .statistics(cw::Statistic::Average)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .datapoints()
            .iter()
            .filter_map(|d| d.average())
            .collect())
    }

    async fn widget_image(&self, widget_json: &str) -> Result<Vec<u8>, MetricError> {
        let output = self
            .client
            .get_metric_widget_image()
            .metric_widget(widget_json)
            .send()
            .await
            .map_err(service_error)?;

        output
            .metric_widget_image()
            .map(|blob| blob.as_ref().to_vec())
            .ok_or(MetricError::EmptyImage)
    }

    async fn list_metric_dimensions(
        &self,
        namespace: &str,
        metric_name: &str,
        filter: &Dimension,
    ) -> Result<Vec<Vec<Dimension>>, MetricError> {
        let output = self
            .client
            .list_metrics()
            .namespace(namespace)
            .metric_name(metric_name)
            .dimensions(
                DimensionFilter::builder()
                    .name(&filter.name)
                    .value(&filter.value)
                    .build(),
            )
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .metrics()
            .iter()
            .map(|m| m.dimensions().iter().map(from_sdk_dimension).collect())
            .collect())
    }
}

fn service_error<E: std::error::Error>(err: E) -> MetricError {
    MetricError::Service(DisplayErrorContext(err).to_string())
}

fn to_sdk_dimension(d: &Dimension) -> cw::Dimension {
    cw::Dimension::builder()
        .name(&d.name)
        .value(&d.value)
        .build()
}

fn from_sdk_dimension(d: &cw::Dimension) -> Dimension {
    Dimension::new(d.name().unwrap_or_default(), d.value().unwrap_or_default())
}

fn sdk_period(period_secs: u32) -> Result<i32, MetricError> {
    i32::try_from(period_secs).map_err(|_| {
        MetricError::InvalidRequest(format!("period {}s does not fit the API", period_secs))
    })
}
