//! Final tally emission on shutdown.

use console::style;
use tracing::{info, warn};

use crate::{consumer::LoopOutcome, format::format_tally_readable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// A single log record carrying the table as JSON.
    #[default]
    Json,
    /// The JSON log record plus a readable table on stdout.
    Text,
}

/// Emit the full tally table as one log record. Best effort: a serialization
/// failure falls back to the debug representation.
pub fn report(outcome: &LoopOutcome, format: ReportFormat) {
    let snapshot = outcome.table.snapshot();

    match snapshot.to_json() {
        Ok(audit) => info!(
            session_id = %outcome.session_id,
            reason = %outcome.reason,
            received = outcome.stats.received,
            decoded = outcome.stats.decoded,
            failed = outcome.stats.failed,
            %audit,
            "audit stats"
        ),
        Err(e) => warn!(
            error = %e,
            session_id = %outcome.session_id,
            audit = ?outcome.table,
            "audit stats"
        ),
    }

    if format == ReportFormat::Text {
        println!(
            "\n{}  {}\n",
            style("audit-tally").cyan().bold(),
            style(format!("{} actions", snapshot.len())).dim()
        );
        println!("{}", format_tally_readable(&snapshot));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;
    use uuid::Uuid;

    use super::*;
    use crate::{
        consumer::{LoopState, LoopStats},
        shutdown::ShutdownReason,
        tally::TallyTable,
    };

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn outcome() -> LoopOutcome {
        let mut table = TallyTable::new();
        for result in ["successful", "successful", "unsuccessful", "attempted"] {
            table.record("login", result);
        }
        table.record("logout", "successful");

        LoopOutcome {
            session_id: Uuid::new_v4(),
            reason: ShutdownReason::Terminate,
            state: LoopState::ShuttingDown,
            table,
            stats: LoopStats {
                received: 5,
                decoded: 5,
                failed: 0,
            },
        }
    }

    #[test]
    fn emits_one_record_with_every_action() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(logs.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || report(&outcome(), ReportFormat::Json));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let records: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .filter(|record: &serde_json::Value| record["fields"]["message"] == "audit stats")
            .collect();
        assert_eq!(records.len(), 1);

        let fields = &records[0]["fields"];
        assert_eq!(fields["reason"], "SIGTERM");
        assert_eq!(fields["received"], 5);

        let audit: serde_json::Value =
            serde_json::from_str(fields["audit"].as_str().unwrap()).unwrap();
        assert_eq!(
            audit["login"],
            serde_json::json!({"attempted": 1, "successful": 2, "unsuccessful": 1, "total": 4})
        );
        assert_eq!(
            audit["logout"],
            serde_json::json!({"attempted": 0, "successful": 1, "unsuccessful": 0, "total": 1})
        );
        assert_eq!(audit.as_object().unwrap().len(), 2);
    }
}
