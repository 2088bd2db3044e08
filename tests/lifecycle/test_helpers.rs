//! Shared fixtures for lifecycle BDD scenarios.

use lvsnap::test_support::LvmSimulator;
use lvsnap::{
    CleanRequest, EngineConfig, LvmEngine, Report, Scope, SnapshotController, SnapshotNaming,
    SnapshotRequest,
};
use rstest::fixture;

/// Verb a `when` step runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verb {
    Snapshot,
    Check,
    Clean,
}

#[derive(Clone, Debug)]
pub enum RunResult {
    Finished(Report),
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct LifecycleContext {
    pub simulator: LvmSimulator,
    pub naming: SnapshotNaming,
    pub percent: u8,
    pub result: Option<RunResult>,
}

#[fixture]
pub fn lifecycle_context() -> LifecycleContext {
    LifecycleContext {
        simulator: LvmSimulator::default(),
        naming: SnapshotNaming::new("", ""),
        percent: 20,
        result: None,
    }
}

impl LifecycleContext {
    /// Runs `verb` over `scope` against the simulator and stores the result.
    pub fn run(mut self, verb: Verb, scope: Scope) -> Self {
        let result = match self.execute(verb, scope) {
            Ok(report) => RunResult::Finished(report),
            Err(message) => RunResult::Failed(message),
        };
        self.result = Some(result);
        self
    }

    fn execute(&self, verb: Verb, scope: Scope) -> Result<Report, String> {
        let engine = LvmEngine::new(EngineConfig::default(), self.simulator.clone())
            .map_err(|err| err.to_string())?;
        let controller = SnapshotController::new(engine);
        let naming = self.naming.clone();
        let outcome = match verb {
            Verb::Snapshot | Verb::Check => {
                let request = SnapshotRequest::new(scope, naming, self.percent)
                    .map_err(|err| err.to_string())?;
                if verb == Verb::Snapshot {
                    controller.snapshot(&request)
                } else {
                    controller.check(&request)
                }
            }
            Verb::Clean => {
                let request = CleanRequest::new(scope, naming).map_err(|err| err.to_string())?;
                controller.clean(&request)
            }
        };
        outcome.map_err(|err| err.to_string())
    }

    /// Report of the last run, if it finished.
    pub fn report(&self) -> Result<&Report, String> {
        match self.result.as_ref() {
            Some(RunResult::Finished(report)) => Ok(report),
            Some(RunResult::Failed(message)) => Err(format!("run failed: {message}")),
            None => Err(String::from("no verb was run")),
        }
    }
}

pub fn group_scope(vg_name: &str) -> Scope {
    Scope::Group {
        vg_name: vg_name.to_owned(),
    }
}

pub fn volume_scope(vg_name: &str, lv_name: &str) -> Scope {
    Scope::Volume {
        vg_name: vg_name.to_owned(),
        lv_name: lv_name.to_owned(),
    }
}
