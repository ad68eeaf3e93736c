//! Remote service integration.
//!
//! Two independent clients: the news aggregator and the prediction service.
//! Both sit behind traits so the application receives them by injection and
//! tests can substitute fakes.

mod converter;
mod news;
mod predictor;
mod wire;

pub use converter::{DataConverter, UNTITLED};
pub use news::{NewsClient, NewsPage, NewsSource, PageToken};
pub use predictor::{PredictionService, PredictorClient};

#[cfg(test)]
pub use news::MockNewsSource;
#[cfg(test)]
pub use predictor::MockPredictionService;
