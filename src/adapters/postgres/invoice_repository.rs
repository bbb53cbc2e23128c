//! PostgreSQL implementation of InvoiceRepository.
//!
//! Status writes are conditional on the status (and total) the caller read,
//! so concurrent webhook deliveries and owner edits resolve in the database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, InvoiceId, OwnedByUser, Timestamp, UserId,
};
use crate::domain::invoice::{
    CustomerContact, Invoice, InvoiceLineItem, InvoiceRecord, InvoiceStatus, TaxRate,
};
use crate::ports::InvoiceRepository;

const NUMBER_CONSTRAINT: &str = "invoices_owner_number_key";

pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<InvoiceLineItem>>, DomainError> {
        let rows: Vec<LineItemRow> = sqlx::query_as(
            r#"
            SELECT invoice_id, position, description, quantity, unit_price
            FROM invoice_line_items
            WHERE invoice_id = ANY($1)
            ORDER BY invoice_id, position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("load line items", e))?;

        let mut grouped: HashMap<Uuid, Vec<InvoiceLineItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.invoice_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn hydrate(&self, rows: Vec<InvoiceRow>) -> Result<Vec<Invoice>, DomainError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items = self.load_items(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let row_items = items.remove(&row.id).unwrap_or_default();
                row.into_invoice(row_items)
            })
            .collect()
    }
}

/// Database row representation of an invoice.
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    owner_id: String,
    invoice_number: String,
    customer_id: Uuid,
    customer_name: String,
    customer_email: String,
    customer_address: Option<String>,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    sub_total: i64,
    tax_rate_bp: i32,
    tax_amount: i64,
    total_amount: i64,
    status: String,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    invoice_id: Uuid,
    #[allow(dead_code)]
    position: i32,
    description: String,
    quantity: i64,
    unit_price: i64,
}

impl From<LineItemRow> for InvoiceLineItem {
    fn from(row: LineItemRow) -> Self {
        InvoiceLineItem {
            description: row.description,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

impl InvoiceRow {
    fn into_invoice(self, items: Vec<InvoiceLineItem>) -> Result<Invoice, DomainError> {
        let id = self.id;
        let corrupt = |what: &str, detail: String| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invoice {} has invalid {}: {}", id, what, detail),
            )
        };

        let owner_id = UserId::new(self.owner_id.clone()).map_err(|e| corrupt("owner_id", e.to_string()))?;
        let status = self
            .status
            .parse::<InvoiceStatus>()
            .map_err(|e| corrupt("status", e))?;
        let tax_rate = u32::try_from(self.tax_rate_bp)
            .map_err(|e| corrupt("tax_rate", e.to_string()))
            .and_then(|bp| TaxRate::from_basis_points(bp).map_err(|e| corrupt("tax_rate", e.to_string())))?;

        Invoice::reconstitute(InvoiceRecord {
            id: InvoiceId::from_uuid(self.id),
            owner_id,
            invoice_number: self.invoice_number,
            customer_id: CustomerId::from_uuid(self.customer_id),
            customer: CustomerContact {
                name: self.customer_name,
                email: self.customer_email,
                address: self.customer_address,
            },
            issue_date: self.issue_date,
            due_date: self.due_date,
            items,
            sub_total: self.sub_total,
            tax_rate,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
            status,
            paid_at: self.paid_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(self.created_at),
            updated_at: Timestamp::from_datetime(self.updated_at),
        })
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invoice {} failed to load: {}", id, e),
            )
        })
    }
}

const SELECT_INVOICE: &str = r#"
    SELECT id, owner_id, invoice_number, customer_id, customer_name, customer_email,
           customer_address, issue_date, due_date, sub_total, tax_rate_bp, tax_amount,
           total_amount, status, paid_at, created_at, updated_at
    FROM invoices
"#;

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, e))
}

fn map_write_error(action: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some(NUMBER_CONSTRAINT) {
            return DomainError::validation("invoice_number", "Invoice number is already used");
        }
        if db_err.constraint() == Some("invoices_pkey") {
            return DomainError::new(ErrorCode::Conflict, "Invoice already exists");
        }
    }
    db_error(action, e)
}

fn tax_rate_bp(invoice: &Invoice) -> i32 {
    // Bounded by 10 000 basis points.
    invoice.totals().tax_rate.basis_points() as i32
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    invoice: &Invoice,
) -> Result<(), DomainError> {
    for (position, item) in invoice.items().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO invoice_line_items (invoice_id, position, description, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(invoice.id().as_uuid())
        .bind(position as i32)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("save line item", e))?;
    }
    Ok(())
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn resolve_customer(
        &self,
        owner_id: &UserId,
        contact: &CustomerContact,
    ) -> Result<CustomerId, DomainError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO customers (id, owner_id, name, email, email_key, address)
            VALUES ($1, $2, $3, $4, lower($4), $5)
            ON CONFLICT (owner_id, email_key) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                address = COALESCE(EXCLUDED.address, customers.address),
                updated_at = now()
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id.as_str())
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("resolve customer", e))?;

        Ok(CustomerId::from_uuid(id))
    }

    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let totals = invoice.totals();
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, owner_id, invoice_number, customer_id, customer_name, customer_email,
                customer_address, issue_date, due_date, sub_total, tax_rate_bp, tax_amount,
                total_amount, status, paid_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(invoice.id().as_uuid())
        .bind(invoice.owner_id().as_str())
        .bind(invoice.invoice_number())
        .bind(invoice.customer_id().as_uuid())
        .bind(&invoice.customer().name)
        .bind(&invoice.customer().email)
        .bind(&invoice.customer().address)
        .bind(invoice.issue_date())
        .bind(invoice.due_date())
        .bind(totals.sub_total)
        .bind(tax_rate_bp(invoice))
        .bind(totals.tax_amount)
        .bind(totals.total_amount)
        .bind(invoice.status().as_str())
        .bind(invoice.paid_at().map(|t| *t.as_datetime()))
        .bind(invoice.created_at().as_datetime())
        .bind(invoice.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error("save invoice", e))?;

        insert_items(&mut tx, invoice).await?;

        tx.commit().await.map_err(|e| db_error("commit invoice", e))
    }

    async fn update(
        &self,
        invoice: &Invoice,
        expected_status: InvoiceStatus,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let totals = invoice.totals();
        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                invoice_number = $3,
                customer_id = $4,
                customer_name = $5,
                customer_email = $6,
                customer_address = $7,
                issue_date = $8,
                due_date = $9,
                sub_total = $10,
                tax_rate_bp = $11,
                tax_amount = $12,
                total_amount = $13,
                updated_at = $14
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(invoice.id().as_uuid())
        .bind(expected_status.as_str())
        .bind(invoice.invoice_number())
        .bind(invoice.customer_id().as_uuid())
        .bind(&invoice.customer().name)
        .bind(&invoice.customer().email)
        .bind(&invoice.customer().address)
        .bind(invoice.issue_date())
        .bind(invoice.due_date())
        .bind(totals.sub_total)
        .bind(tax_rate_bp(invoice))
        .bind(totals.tax_amount)
        .bind(totals.total_amount)
        .bind(invoice.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error("update invoice", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Invoice {} changed before the update was saved", invoice.id()),
            ));
        }

        sqlx::query("DELETE FROM invoice_line_items WHERE invoice_id = $1")
            .bind(invoice.id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("replace line items", e))?;
        insert_items(&mut tx, invoice).await?;

        tx.commit().await.map_err(|e| db_error("commit invoice", e))
    }

    async fn save_status(
        &self,
        invoice: &Invoice,
        expected_status: InvoiceStatus,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET status = $4, paid_at = $5, updated_at = $6
            WHERE id = $1 AND status = $2 AND total_amount = $3
            "#,
        )
        .bind(invoice.id().as_uuid())
        .bind(expected_status.as_str())
        .bind(invoice.total_amount())
        .bind(invoice.status().as_str())
        .bind(invoice.paid_at().map(|t| *t.as_datetime()))
        .bind(invoice.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update invoice status", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_INVOICE))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("load invoice", e))?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: InvoiceId, owner_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "DELETE FROM invoices WHERE id = $1 AND owner_id = $2 AND status <> 'paid'",
        )
        .bind(id.as_uuid())
        .bind(owner_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("delete invoice", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_status_due_on(
        &self,
        status: InvoiceStatus,
        due_date: NaiveDate,
    ) -> Result<Vec<Invoice>, DomainError> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(&format!(
            "{} WHERE status = $1 AND due_date = $2 ORDER BY created_at",
            SELECT_INVOICE
        ))
        .bind(status.as_str())
        .bind(due_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list invoices", e))?;

        self.hydrate(rows).await
    }

    async fn find_by_status_due_before(
        &self,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> Result<Vec<Invoice>, DomainError> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(&format!(
            "{} WHERE status = $1 AND due_date < $2 ORDER BY due_date",
            SELECT_INVOICE
        ))
        .bind(status.as_str())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list invoices", e))?;

        self.hydrate(rows).await
    }
}
