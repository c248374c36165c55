//! The polling loop: fetch, filter, report, alert, sleep.

use chrono::NaiveDate;
use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::models::Center;
use crate::services::api_client::{AppointmentSource, SearchArea};
use crate::services::eligibility::SlotFilter;
use crate::services::notifier::Notifier;
use crate::services::report;
use crate::utils::resolve_date;

/// Settings for one watch run.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub area: SearchArea,
    pub filter: SlotFilter,
    pub interval: Duration,
    pub stop_if_found: bool,
    pub notify: bool,
    /// Mobile to request an OTP for when slots appear.
    pub otp_mobile: Option<String>,
    /// Stop after this many polls.
    pub max_polls: Option<u64>,
    /// Print each poll's matches to stdout.
    pub print: bool,
}

impl WatchOptions {
    /// Build options from the merged configuration. Fails if no area is set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let watch = &config.watch;
        let area = match (watch.district_id, watch.pincode) {
            (Some(id), _) => SearchArea::District(id),
            (None, Some(pin)) => SearchArea::Pincode(pin),
            (None, None) => anyhow::bail!("Nothing to watch: set a district id or a pincode"),
        };

        Ok(Self {
            area,
            filter: SlotFilter::new(watch.min_age_limit).with_vaccine(watch.vaccine.clone()),
            interval: watch.interval(),
            stop_if_found: watch.stop_if_found,
            notify: watch.notify,
            otp_mobile: if watch.request_otp {
                watch.mobile.clone()
            } else {
                None
            },
            max_polls: None,
            print: true,
        })
    }
}

/// How a watch run ended up.
#[derive(Debug, Clone, Default)]
pub struct WatchSummary {
    pub polls: u64,
    pub matched_polls: u64,
    pub last_matches: Vec<Center>,
}

pub struct Monitor<S, N> {
    source: S,
    notifier: N,
    options: WatchOptions,
}

impl<S: AppointmentSource, N: Notifier> Monitor<S, N> {
    pub fn new(source: S, notifier: N, options: WatchOptions) -> Self {
        Self {
            source,
            notifier,
            options,
        }
    }

    /// One fetch-and-filter pass. API failures count as no matches.
    pub async fn poll_once(&self, from: NaiveDate) -> Vec<Center> {
        let centers = match self.source.fetch_centers(self.options.area, from).await {
            Ok(centers) => centers,
            Err(e) if e.is_transient() => {
                tracing::warn!("API did not return any data, continuing to check: {}", e);
                return Vec::new();
            }
            Err(e) => {
                tracing::error!("API request for {} failed: {}", self.options.area, e);
                return Vec::new();
            }
        };

        let eligible = self.options.filter.apply(centers);
        if self.options.print {
            report::print_centers(&eligible);
        }
        eligible
    }

    /// Notify and request an OTP. Failures are logged, never fatal.
    async fn alert(&self) {
        if self.options.notify {
            if let Err(e) = self.notifier.notify().await {
                tracing::error!("Failed to send notification: {:#}", e);
            }
        }

        if let Some(mobile) = &self.options.otp_mobile {
            match self.source.request_otp(mobile).await {
                Ok(response) => {
                    tracing::info!(txn_id = %response.txn_id, "OTP generation request sent to {}", mobile)
                }
                Err(e) => tracing::error!("Failed to generate OTP for {}: {}", mobile, e),
            }
        }
    }

    /// Poll until a stop condition: matches with `stop_if_found`,
    /// `max_polls` reached, or Ctrl-C.
    pub async fn run(&self) -> WatchSummary {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Like [`Monitor::run`], but stops when `shutdown` resolves. The
    /// future is watched across polls and sleeps alike.
    pub async fn run_until<F: Future<Output = ()>>(&self, shutdown: F) -> WatchSummary {
        let mut summary = WatchSummary::default();
        tracing::info!(
            "Watching {} every {:?} (age {}, vaccine {})",
            self.options.area,
            self.options.interval,
            self.options.filter.min_age_limit,
            self.options.filter.vaccine.as_deref().unwrap_or("any")
        );

        tokio::pin!(shutdown);

        loop {
            summary.polls += 1;

            let eligible = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Interrupted, stopping");
                    break;
                }
                eligible = self.poll_and_alert() => eligible,
            };

            if !eligible.is_empty() {
                summary.matched_polls += 1;
                summary.last_matches = eligible;

                if self.options.stop_if_found {
                    tracing::warn!("Slots found and stop_if_found is set, stopping");
                    break;
                }
            }

            if self
                .options
                .max_polls
                .is_some_and(|max| summary.polls >= max)
            {
                tracing::info!("Reached {} polls, stopping", summary.polls);
                break;
            }

            tracing::info!("Sleeping for {} seconds", self.options.interval.as_secs());
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Interrupted, stopping");
                    break;
                }
                _ = tokio::time::sleep(self.options.interval) => {}
            }
        }

        summary
    }

    /// Poll for today and alert on matches.
    async fn poll_and_alert(&self) -> Vec<Center> {
        let eligible = self.poll_once(resolve_date(None)).await;
        if !eligible.is_empty() {
            self.alert().await;
        }
        eligible
    }
}
