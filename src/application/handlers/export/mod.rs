//! Account data export.

mod export_user_data;

pub use export_user_data::{
    render_csv, DecisionStatistics, ExportUserDataHandler, ExportUserDataQuery,
    ExportedBinaryConfig, ExportedChoice, ExportedDecision, ExportedMultiChoiceConfig,
    ExportedRoll, ExportedRollWeight, ExportedUser, UserDataExport,
};
