//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for barsim.
///
/// Feed exhaustion is deliberately not here: running out of bars is the
/// normal terminal signal of a replay, reported as `false` from
/// `DataFeed::advance`, not as an error.
#[derive(Debug, thiserror::Error)]
pub enum BarsimError {
    #[error("empty bar series for {instrument}")]
    EmptySeries { instrument: String },

    #[error(
        "misaligned series for {instrument}: first bar {first} is after timeline start {timeline_start}"
    )]
    MisalignedSeries {
        instrument: String,
        first: NaiveDate,
        timeline_start: NaiveDate,
    },

    #[error("unknown instrument: {instrument}")]
    UnknownInstrument { instrument: String },

    #[error("dequeue from empty event queue")]
    EmptyQueue,

    #[error("invalid order for {instrument}: {reason}")]
    InvalidOrder { instrument: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BarsimError> for std::process::ExitCode {
    fn from(err: &BarsimError) -> Self {
        let code: u8 = match err {
            BarsimError::Io(_) => 1,
            BarsimError::ConfigParse { .. }
            | BarsimError::ConfigMissing { .. }
            | BarsimError::ConfigInvalid { .. } => 2,
            BarsimError::Data { .. } => 3,
            BarsimError::EmptySeries { .. }
            | BarsimError::MisalignedSeries { .. }
            | BarsimError::UnknownInstrument { .. } => 4,
            BarsimError::EmptyQueue | BarsimError::InvalidOrder { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = BarsimError::EmptySeries {
            instrument: "AAA".into(),
        };
        assert_eq!(err.to_string(), "empty bar series for AAA");

        let err = BarsimError::UnknownInstrument {
            instrument: "ZZZ".into(),
        };
        assert_eq!(err.to_string(), "unknown instrument: ZZZ");

        let err = BarsimError::EmptyQueue;
        assert_eq!(err.to_string(), "dequeue from empty event queue");
    }

    #[test]
    fn exit_codes_group_by_taxonomy() {
        use std::process::ExitCode;

        let config_err = BarsimError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        };
        // ExitCode has no accessor, so just check the conversion compiles
        // for each class and is the documented mapping at the source level.
        let _: ExitCode = (&config_err).into();
        let _: ExitCode = (&BarsimError::EmptyQueue).into();
        let _: ExitCode = (&BarsimError::Data {
            reason: "bad row".into(),
        })
            .into();
    }
}
