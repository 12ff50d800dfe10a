//! Loans and returns service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::{Loan, LoanClosure, LoanForm, LoanReturn, NewLoanReturn},
    },
    repository::Repository,
    store::Subscription,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List loans, optionally only those with the given status
    pub async fn list(&self, status: Option<LoanStatus>) -> AppResult<Vec<Loan>> {
        let loans = self.repository.loans.list().await?;
        Ok(match status {
            Some(status) => loans.into_iter().filter(|l| l.status == status).collect(),
            None => loans,
        })
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Loan> {
        self.repository.loans.get(id).await
    }

    /// Record a new loan. The form is fully checked before anything is written.
    pub async fn create(&self, form: LoanForm) -> AppResult<Loan> {
        let data = form.into_new_loan(Utc::now())?;
        let loan = self.repository.loans.create(&data).await?;
        tracing::info!(
            "Loaned '{}' ({}) to {}",
            loan.book_title,
            loan.inventory_number,
            loan.full_name()
        );
        Ok(loan)
    }

    /// Close a loan: mark it returned (guarded by its version), then store the
    /// return entry. If the entry cannot be written the loan is reopened so the
    /// return can be retried.
    pub async fn return_loan(&self, id: &str) -> AppResult<LoanReturn> {
        let loan = self.repository.loans.get(id).await?;
        if loan.status != LoanStatus::Loaned {
            return Err(AppError::Conflict(format!("Loan {} was already returned", id)));
        }

        let returned_at = Utc::now();
        let closed = self
            .repository
            .loans
            .update(&loan.id, &LoanClosure::returned(returned_at), Some(loan.version))
            .await?;

        let entry = match self
            .repository
            .returns
            .create(&NewLoanReturn::from_loan(&loan, returned_at))
            .await
        {
            Ok(entry) => entry,
            Err(e) => {
                if let Err(reopen) = self
                    .repository
                    .loans
                    .update(&loan.id, &LoanClosure::reopened(), Some(closed.version))
                    .await
                {
                    tracing::error!(
                        "Loan {} left returned without a history entry: {}",
                        loan.id,
                        reopen
                    );
                }
                return Err(e);
            }
        };
        tracing::info!("Returned loan {} ('{}')", loan.id, loan.book_title);
        Ok(entry)
    }

    /// Return history in the order returns were recorded
    pub async fn list_returns(&self) -> AppResult<Vec<LoanReturn>> {
        self.repository.returns.list().await
    }

    pub async fn subscribe(&self) -> AppResult<Subscription> {
        self.repository.loans.subscribe().await
    }
}
