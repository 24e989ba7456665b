//! Stage timing for sample extraction, compiled in with the `profiling` feature.
//!
//! Reports are logged at the info level. Set `DRESSCODE_PROFILING_WHITELIST`
//! to a comma-separated list of timing names to restrict which are reported.

use crate::common::*;

#[cfg(feature = "profiling")]
use dashmap::DashSet;
#[cfg(feature = "profiling")]
use lazy_static::lazy_static;

#[cfg(feature = "profiling")]
lazy_static! {
    static ref PROFILING_CONFIG: ProfilingConfig = ProfilingConfig::from_env();
    static ref SEEN_TIMINGS: DashSet<&'static str> = DashSet::new();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilingConfig {
    pub profiling_whitelist: Option<HashSet<String>>,
}

impl ProfilingConfig {
    #[cfg(feature = "profiling")]
    pub fn from_env() -> Self {
        envy::prefixed("DRESSCODE_")
            .from_env()
            .unwrap_or_else(|err| {
                warn!(
                    "ignore invalid profiling environment variables, use defaults: {}",
                    err
                );
                Self::default()
            })
    }

    pub fn allows(&self, name: &str) -> bool {
        self.profiling_whitelist
            .as_ref()
            .map(|whitelist| whitelist.contains(name))
            .unwrap_or(true)
    }
}

#[cfg(feature = "profiling")]
#[derive(Debug)]
pub struct Timing {
    name: &'static str,
    start: Instant,
    last: Instant,
    stages: Vec<(&'static str, Duration)>,
}

#[cfg(not(feature = "profiling"))]
#[derive(Debug)]
pub struct Timing;

impl Timing {
    pub fn new(name: &'static str) -> Self {
        #[cfg(feature = "profiling")]
        {
            if SEEN_TIMINGS.insert(name) {
                info!("start profiling '{}'", name);
            }
            let now = Instant::now();
            Self {
                name,
                start: now,
                last: now,
                stages: vec![],
            }
        }

        #[cfg(not(feature = "profiling"))]
        {
            let _ = name;
            Self
        }
    }

    /// Record the time spent since the previous stage.
    pub fn mark(&mut self, stage: &'static str) {
        #[cfg(feature = "profiling")]
        {
            let now = Instant::now();
            self.stages.push((stage, now - self.last));
            self.last = now;
        }

        #[cfg(not(feature = "profiling"))]
        let _ = stage;
    }

    pub fn report(&self) {
        #[cfg(feature = "profiling")]
        {
            if !PROFILING_CONFIG.allows(self.name) {
                return;
            }
            info!(
                "'{}' took {:?} in total",
                self.name,
                self.start.elapsed()
            );
            self.stages.iter().for_each(|(stage, elapsed)| {
                info!("- {}\t{:?}", stage, elapsed);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_filters_names() {
        let config = ProfilingConfig::default();
        assert!(config.allows("sample"));

        let config = ProfilingConfig {
            profiling_whitelist: Some(["index".to_string()].into_iter().collect()),
        };
        assert!(config.allows("index"));
        assert!(!config.allows("sample"));
    }

    #[test]
    fn timing_records_stages() {
        let mut timing = Timing::new("test");
        timing.mark("first");
        timing.mark("second");
        timing.report();

        #[cfg(feature = "profiling")]
        assert_eq!(
            timing.stages.iter().map(|(stage, _)| *stage).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }
}
