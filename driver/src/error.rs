use error_stack::Report;
use kernel::KernelError;

pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

// https://www.postgresql.org/docs/current/errcodes-appendix.html
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                sqlx::Error::PoolTimedOut => KernelError::Timeout,
                sqlx::Error::Database(db) if db.is_unique_violation() => KernelError::Conflict,
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    KernelError::NotFound
                }
                sqlx::Error::Database(db) if db.is_check_violation() => KernelError::Validation,
                sqlx::Error::Database(db)
                    if matches!(
                        db.code().as_deref(),
                        Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
                    ) =>
                {
                    KernelError::Concurrency
                }
                _ => KernelError::Internal,
            };
            Report::new(error).change_context(context)
        })
    }
}
