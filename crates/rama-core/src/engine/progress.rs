/// Events emitted while structures move through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A batch of `total` structures is about to be analysed.
    BatchStart { total: u64 },
    /// One structure finished and contributed `torsions` retained records.
    StructureDone { name: String, torsions: usize },
    /// One structure failed; the rest of the batch continues.
    StructureFailed { name: String, reason: String },
    BatchFinish,

    /// A residue was dropped under the skip policy.
    ResidueSkipped { residue: String, reason: String },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
///
/// Callbacks may be invoked from several rayon worker threads at once during batch runs.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::BatchFinish);
    }

    #[test]
    fn reporter_forwards_events_to_callback_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(event);
        }));

        reporter.report(Progress::BatchStart { total: 2 });
        reporter.report(Progress::StructureDone {
            name: "1abc".to_string(),
            torsions: 42,
        });
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(
            seen,
            vec![
                Progress::BatchStart { total: 2 },
                Progress::StructureDone {
                    name: "1abc".to_string(),
                    torsions: 42,
                },
            ]
        );
    }
}
