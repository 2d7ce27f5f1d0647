use thiserror::Error;

/// Everything that can stop an ETL run.
///
/// Nothing here is retried; the first failure is reported once over the
/// progress channel and the run ends. Database failures inside the
/// transaction are classified into [`DbViolation`] so the caller sees
/// which constraint fired without us leaking driver internals.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Missing Secret Key for API Gateway")]
    Config,

    #[error("API Gateway invocation failed [{status}]: {message}")]
    Trigger {
        status: String,
        body: String,
        message: String,
    },

    #[error("TSV download from S3 presigned_url failed: {location}")]
    ArtifactDownload { location: String },

    #[error("artifact matches no known dataset: {location}")]
    UnknownArtifact { location: String },

    #[error("SQL generation request to {route} failed")]
    TransformProxy { route: String },

    #[error("SQL batches missing for datasets: {}", .0.join(", "))]
    IncompleteBatch(Vec<&'static str>),

    /// A post-apply verification query came back unusable (zero staged
    /// rows, missing count column). Distinct from [`DbViolation`] so the
    /// caller sees the check's own message, not the rollback wording.
    #[error("{0}")]
    Verification(String),

    #[error(transparent)]
    Ingestion(#[from] DbViolation),
}

impl EtlError {
    /// Build a trigger error out of a reqwest failure, preserving status,
    /// body and message for diagnostics.
    pub fn trigger_failure(status: Option<reqwest::StatusCode>, body: String, message: String) -> Self {
        EtlError::Trigger {
            status: status.map(|s| s.as_u16().to_string()).unwrap_or_else(|| "-".to_string()),
            body,
            message,
        }
    }
}

/// Database failure classified by SQLSTATE, produced by a thin adapter
/// over `sqlx::Error` so the ingestion engine's control flow stays
/// independent of the driver's error representation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbViolation {
    #[error("Foreign Key violation: {detail}")]
    ForeignKey { detail: String },

    #[error("Unique Key violation: {detail}")]
    Unique { detail: String },

    #[error("Transaction ROLLBACK. The ETL Insertion process has failed. {message}")]
    Other { message: String },
}

const SQLSTATE_FOREIGN_KEY: &str = "23503";
const SQLSTATE_UNIQUE: &str = "23505";

/// Classify by SQLSTATE code plus the driver's detail/message strings.
pub fn classify_parts(code: Option<&str>, detail: Option<&str>, message: &str) -> DbViolation {
    let detail = detail.filter(|d| !d.is_empty()).unwrap_or(message);
    match code {
        Some(SQLSTATE_FOREIGN_KEY) => DbViolation::ForeignKey {
            detail: detail.to_string(),
        },
        Some(SQLSTATE_UNIQUE) => DbViolation::Unique {
            detail: detail.to_string(),
        },
        _ => DbViolation::Other {
            message: message.to_string(),
        },
    }
}

/// Adapter from a raw sqlx error to the tagged violation.
pub fn classify(err: sqlx::Error) -> DbViolation {
    match &err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned());
            let detail = db_err
                .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                .and_then(|pg| pg.detail().map(str::to_string));
            classify_parts(code.as_deref(), detail.as_deref(), db_err.message())
        }
        other => DbViolation::Other {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_code_maps_to_fk_violation() {
        let v = classify_parts(
            Some("23503"),
            Some("Key (category_id)=(99) is not present in table \"category\"."),
            "insert or update violates foreign key constraint",
        );
        assert_eq!(
            v.to_string(),
            "Foreign Key violation: Key (category_id)=(99) is not present in table \"category\"."
        );
    }

    #[test]
    fn unique_code_maps_to_unique_violation() {
        let v = classify_parts(Some("23505"), Some("Key (isin)=(IE00B4L5Y983) already exists."), "dup");
        assert!(v.to_string().starts_with("Unique Key violation:"));
    }

    #[test]
    fn other_codes_use_rollback_wording() {
        let v = classify_parts(Some("42601"), None, "syntax error at or near \"INSRT\"");
        assert_eq!(
            v.to_string(),
            "Transaction ROLLBACK. The ETL Insertion process has failed. syntax error at or near \"INSRT\""
        );
    }

    #[test]
    fn missing_detail_falls_back_to_message() {
        let v = classify_parts(Some("23503"), None, "fk broke");
        assert_eq!(v, DbViolation::ForeignKey { detail: "fk broke".to_string() });
    }

    #[test]
    fn incomplete_batch_lists_missing_names() {
        let e = EtlError::IncompleteBatch(vec!["income", "investments"]);
        assert_eq!(e.to_string(), "SQL batches missing for datasets: income, investments");
    }
}
