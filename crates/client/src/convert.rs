//! Conversions between the store's wire shapes and engine types.

use api_types::{
    entry::{EntryFields, EntryRef, EntryView},
    totals::{DashboardYearResponse, TotalsView},
};
use engine::{
    Amount, EngineError, EntryData, EntryId, LedgerEntry, MonthKey, Nature, PaymentMethod,
    Totals, YearTotals, mask, parse_date,
};

pub fn entry_id(id: &EntryRef) -> EntryId {
    EntryId::new(id.to_string())
}

/// Wire form of an id: numeric ids go back as numbers, anything else as text.
pub fn entry_ref(id: &EntryId) -> EntryRef {
    match id.as_str().parse::<i64>() {
        Ok(number) if number.to_string() == id.as_str() => EntryRef::Number(number),
        _ => EntryRef::Text(id.as_str().to_string()),
    }
}

fn optional_label<T>(value: Option<&str>) -> Result<Option<T>, EngineError>
where
    T: std::str::FromStr<Err = EngineError>,
{
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.parse().map(Some),
        _ => Ok(None),
    }
}

/// Reads a listed entry. Amounts are magnitudes; the kind carries the sign.
pub fn entry_from_view(view: EntryView) -> Result<LedgerEntry, EngineError> {
    let date = match view.date.trim() {
        "" => parse_date(view.date_br.as_deref().unwrap_or_default())?,
        date => parse_date(date)?,
    };
    let data = EntryData {
        date,
        amount: Amount::new(view.value_minor.saturating_abs()),
        description: view.description.trim().to_string(),
        kind: view.kind.parse()?,
        nature: optional_label::<Nature>(Some(view.nature.as_str()))?,
        payment: optional_label::<PaymentMethod>(view.payment.as_deref())?,
    };
    Ok(LedgerEntry::new(entry_id(&view.id), data))
}

pub fn entry_view(entry: &LedgerEntry) -> EntryView {
    let data = &entry.data;
    EntryView {
        id: entry_ref(&entry.id),
        date: data.date.format("%Y-%m-%d").to_string(),
        date_br: Some(data.date.format("%d/%m/%Y").to_string()),
        description: data.description.clone(),
        value_minor: data.amount.cents(),
        kind: data.kind.label().to_string(),
        nature: data.nature.map(|n| n.label()).unwrap_or_default().to_string(),
        payment: data.payment.map(|p| p.label().to_string()),
    }
}

/// Fields sent by `add` and `update`.
pub fn entry_fields(data: &EntryData) -> EntryFields {
    EntryFields {
        date: data.date.format("%Y-%m-%d").to_string(),
        description: data.description.clone(),
        value: data.amount.to_string(),
        kind: data.kind.label().to_string(),
        nature: data.nature.map(|n| n.label()).unwrap_or_default().to_string(),
        pay: data.payment.map(|p| p.label()).unwrap_or_default().to_string(),
    }
}

/// Reads the fields of `add`/`update` the way the store does.
pub fn entry_from_fields(fields: &EntryFields) -> Result<EntryData, EngineError> {
    Ok(EntryData {
        date: parse_date(&fields.date)?,
        amount: mask::to_number(&fields.value)?,
        description: fields.description.trim().to_string(),
        kind: fields.kind.parse()?,
        nature: optional_label::<Nature>(Some(fields.nature.as_str()))?,
        payment: optional_label::<PaymentMethod>(Some(fields.pay.as_str()))?,
    })
}

/// The store's `saldo` is ignored; the balance is always derived.
pub fn totals_from_view(view: &TotalsView) -> Totals {
    Totals {
        expense: Amount::new(view.gasto),
        income: Amount::new(view.recebimento),
        fixed_expense: Amount::new(view.fixo_gasto),
        variable_expense: Amount::new(view.variavel_gasto),
        fixed_income: Amount::new(view.fixo_receb),
        variable_income: Amount::new(view.variavel_receb),
    }
}

pub fn totals_view(totals: &Totals) -> TotalsView {
    TotalsView {
        gasto: totals.expense.cents(),
        recebimento: totals.income.cents(),
        saldo: totals.balance().cents(),
        fixo_gasto: totals.fixed_expense.cents(),
        variavel_gasto: totals.variable_expense.cents(),
        fixo_receb: totals.fixed_income.cents(),
        variavel_receb: totals.variable_income.cents(),
    }
}

pub fn year_totals_from_response(
    year: i32,
    res: &DashboardYearResponse,
) -> Result<YearTotals, EngineError> {
    let by_month = res
        .by_month
        .iter()
        .flatten()
        .map(|row| {
            let month: MonthKey = row.month.parse()?;
            if month.year() != year {
                return Err(EngineError::InvalidMonth(format!(
                    "{month} is not part of {year}"
                )));
            }
            Ok((month, totals_from_view(&row.totals)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(YearTotals {
        year,
        totals: totals_from_view(&res.totals),
        by_month,
    })
}
