//! Scripted `StatsSource` for store and comparison tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;
use wbi_connectivity::{ApiError, Country, DataPoint, StatsSource};

type Reply<T> = oneshot::Receiver<Result<T, ApiError>>;

/// Answers each call with the next scripted reply for that call's key.
///
/// Replies are oneshot channels so a test can hold a response back and
/// release it later, controlling the order in which requests resolve.
#[derive(Default)]
pub struct ScriptedSource {
    countries: Mutex<VecDeque<Reply<Vec<Country>>>>,
    series: Mutex<HashMap<(String, String), VecDeque<Reply<Vec<DataPoint>>>>>,
    latest: Mutex<HashMap<String, VecDeque<Reply<Option<f64>>>>>,
    pub calls: AtomicUsize,
}

fn ready<T>(result: Result<T, ApiError>) -> Reply<T> {
    let (tx, rx) = oneshot::channel();
    let _ = tx.send(result);
    rx
}

async fn wait<T>(reply: Option<Reply<T>>, what: &str) -> Result<T, ApiError> {
    match reply {
        Some(rx) => rx.await.unwrap_or_else(|_| Err(network_error("reply dropped"))),
        None => Err(network_error(&format!("unscripted call: {}", what))),
    }
}

pub fn network_error(message: &str) -> ApiError {
    ApiError::Network {
        url: "http://test.invalid".into(),
        message: message.into(),
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reply_countries(&self, result: Result<Vec<Country>, ApiError>) {
        self.countries.lock().unwrap().push_back(ready(result));
    }

    /// Queue a countries reply that is sent only through the returned sender.
    pub fn hold_countries(&self) -> oneshot::Sender<Result<Vec<Country>, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.countries.lock().unwrap().push_back(rx);
        tx
    }

    pub fn reply_series(
        &self,
        country: &str,
        indicator: &str,
        result: Result<Vec<DataPoint>, ApiError>,
    ) {
        self.series
            .lock()
            .unwrap()
            .entry((country.into(), indicator.into()))
            .or_default()
            .push_back(ready(result));
    }

    pub fn hold_series(
        &self,
        country: &str,
        indicator: &str,
    ) -> oneshot::Sender<Result<Vec<DataPoint>, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.series
            .lock()
            .unwrap()
            .entry((country.into(), indicator.into()))
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn reply_latest(&self, country: &str, result: Result<Option<f64>, ApiError>) {
        self.latest
            .lock()
            .unwrap()
            .entry(country.into())
            .or_default()
            .push_back(ready(result));
    }
}

#[async_trait]
impl StatsSource for ScriptedSource {
    async fn list_countries(&self) -> Result<Vec<Country>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.countries.lock().unwrap().pop_front();
        wait(reply, "list_countries").await
    }

    async fn indicator_series(
        &self,
        country_id: &str,
        indicator_id: &str,
        _max_points: u32,
    ) -> Result<Vec<DataPoint>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .series
            .lock()
            .unwrap()
            .get_mut(&(country_id.to_string(), indicator_id.to_string()))
            .and_then(VecDeque::pop_front);
        wait(reply, &format!("series {}/{}", country_id, indicator_id)).await
    }

    async fn latest_value(
        &self,
        country_id: &str,
        _indicator_id: &str,
    ) -> Result<Option<f64>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .latest
            .lock()
            .unwrap()
            .get_mut(country_id)
            .and_then(VecDeque::pop_front);
        wait(reply, &format!("latest {}", country_id)).await
    }
}

pub fn usa() -> Country {
    Country::new("USA", "United States", "North America", "Washington")
}

pub fn aggregate() -> Country {
    Country::new("ZZZ", "Aggregates", "Aggregates", "")
}

pub fn point(indicator: &str, country: &str, date: &str, value: Option<f64>) -> DataPoint {
    DataPoint::new(indicator, country, date, value)
}
