// ═══════════════════════════════════════════════════════════════════
// Migration Tests — total decoding of persisted / legacy state blobs
// ═══════════════════════════════════════════════════════════════════

use serde_json::{json, Value};

use finance_tracker_core::migration::coerce::{to_date_text, to_finite_number, to_identifier, to_optional_number, to_text};
use finance_tracker_core::migration::{infer_holding_id, migrate, migrate_str};
use finance_tracker_core::models::budget::BudgetCategory;
use finance_tracker_core::models::investment::HoldingRow;
use finance_tracker_core::models::savings::{SavingsBucket, SectionTab};
use finance_tracker_core::models::state::AppState;
use finance_tracker_core::seed;

fn remigrate(state: &AppState) -> AppState {
    migrate(&serde_json::to_value(state).unwrap())
}

fn holding(id: &str, name: &str, amount: f64) -> HoldingRow {
    HoldingRow {
        id: id.into(),
        name: name.into(),
        location: String::new(),
        amount,
    }
}

// ── Fallbacks ───────────────────────────────────────────────────────

mod fallbacks {
    use super::*;

    #[test]
    fn non_object_root_gives_seed() {
        for raw in [Value::Null, json!(42), json!("state"), json!([1, 2, 3])] {
            assert_eq!(migrate(&raw), seed::default_state());
        }
    }

    #[test]
    fn unparseable_text_gives_seed() {
        assert_eq!(migrate_str("{not json"), seed::default_state());
        assert_eq!(migrate_str(""), seed::default_state());
    }

    #[test]
    fn empty_object_gets_structural_defaults() {
        let state = migrate(&json!({}));
        assert!(state.budget.monthly_expenses.is_empty());
        assert!(state.budget.yearly_expenses.is_empty());
        assert!(state.budget.income_streams.is_empty());
        assert_eq!(state.budget.monthly_budget_items, seed::default_monthly_budget_items());
        assert_eq!(state.savings.sections, seed::default_sections());
        assert!(state.investments.holdings.is_empty());
        assert_eq!(state.investments.start_date, "");
    }

    #[test]
    fn wrong_typed_collections_become_empty() {
        let state = migrate(&json!({
            "budget": { "monthlyExpenses": "lots", "incomeStreams": 12 },
            "investments": { "holdings": { "id": "h1" } }
        }));
        assert!(state.budget.monthly_expenses.is_empty());
        assert!(state.budget.income_streams.is_empty());
        assert!(state.investments.holdings.is_empty());
    }
}

// ── Fixed points ────────────────────────────────────────────────────

mod idempotence {
    use super::*;

    #[test]
    fn seed_is_a_fixed_point() {
        let seed = seed::default_state();
        assert_eq!(remigrate(&seed), seed);
    }

    #[test]
    fn messy_input_migrates_once() {
        let raw = json!({
            "budget": {
                "monthlyExpenses": [
                    { "id": "a", "label": "Rent", "date": "2024-08-01", "amount": "950" },
                    { "id": "a", "label": 7, "date": "45", "amount": null },
                    "garbage"
                ],
                "yearlyExpenses": [{ "name": "Insurance", "date": "2024-03-14", "amount": 480 }],
                "monthlySpendingBudget": 300
            },
            "primary": {
                "cashStash": "100",
                "regularDeposits": [{ "date": "45505", "amount": 50, "target": 60 }],
                "marketChanges": [{ "amount": 5, "holdingId": "nowhere" }]
            },
            "investments": {
                "startDate": "2024-01-01",
                "holdings": [{ "id": 3, "name": "World Fund", "invested": "1000" }],
                "marketChanges": [{ "note": "World fund up", "value": 1100 }]
            }
        });

        let once = migrate(&raw);
        assert_eq!(remigrate(&once), once);
    }

    #[test]
    fn legacy_layout_migrates_once() {
        let once = migrate(&json!({
            "savings": { "secondary": { "withdrawals": [{ "amount": 10 }] } }
        }));
        assert_eq!(remigrate(&once), once);
    }
}

// ── Row ids ─────────────────────────────────────────────────────────

mod row_ids {
    use super::*;

    #[test]
    fn duplicates_and_blanks_are_backfilled() {
        let state = migrate(&json!({
            "budget": { "monthlyExpenses": [
                { "id": "a" },
                { "id": "a" },
                {},
                { "id": "   " },
                5,
                { "id": 7 }
            ]}
        }));
        let ids: Vec<&str> = state.budget.monthly_expenses.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["a", "monthly-expense-1", "monthly-expense-2", "monthly-expense-3", "7"]
        );
    }

    #[test]
    fn backfill_skips_ids_already_in_use() {
        let state = migrate(&json!({
            "budget": { "monthlyExpenses": [{}, { "id": "monthly-expense-1" }] }
        }));
        let ids: Vec<&str> = state.budget.monthly_expenses.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["monthly-expense-2", "monthly-expense-1"]);
    }

    #[test]
    fn ids_are_trimmed() {
        let state = migrate(&json!({
            "investments": { "holdings": [{ "id": "  h1 ", "name": "Fund" }] }
        }));
        assert_eq!(state.investments.holdings[0].id, "h1");
    }
}

// ── Coercion ────────────────────────────────────────────────────────

mod coercion {
    use super::*;

    #[test]
    fn numeric_fields() {
        assert_eq!(to_finite_number(Some(&json!(12.5)), 0.0), 12.5);
        assert_eq!(to_finite_number(Some(&json!(" 3 ")), 0.0), 3.0);
        assert_eq!(to_finite_number(Some(&json!("abc")), 0.0), 0.0);
        assert_eq!(to_finite_number(Some(&json!("NaN")), 0.0), 0.0);
        assert_eq!(to_finite_number(Some(&json!("inf")), 1.0), 1.0);
        assert_eq!(to_finite_number(Some(&json!(true)), 0.0), 0.0);
        assert_eq!(to_finite_number(Some(&Value::Null), 0.0), 0.0);
        assert_eq!(to_finite_number(None, 9.0), 9.0);
    }

    #[test]
    fn optional_numbers_keep_absence() {
        assert_eq!(to_optional_number(Some(&json!(""))), None);
        assert_eq!(to_optional_number(Some(&json!("2500"))), Some(2500.0));
        assert_eq!(to_optional_number(None), None);
    }

    #[test]
    fn text_fields() {
        assert_eq!(to_text(Some(&json!("Rent"))), "Rent");
        assert_eq!(to_text(Some(&json!(42))), "");
        assert_eq!(to_text(None), "");
    }

    #[test]
    fn identifiers() {
        assert_eq!(to_identifier(Some(&json!(" x "))), Some("x".into()));
        assert_eq!(to_identifier(Some(&json!(12))), Some("12".into()));
        assert_eq!(to_identifier(Some(&json!(""))), None);
        assert_eq!(to_identifier(Some(&json!(["x"]))), None);
    }

    #[test]
    fn rows_coerce_each_field() {
        let state = migrate(&json!({
            "budget": { "monthlyExpenses": [
                { "id": "m1", "label": 99, "date": 12, "amount": "12.50" },
                { "id": "m2", "label": "Phone", "date": "18", "amount": {} }
            ]}
        }));
        let rows = &state.budget.monthly_expenses;
        assert_eq!(rows[0].label, "");
        assert_eq!(rows[0].date, "");
        assert_eq!(rows[0].amount, 12.5);
        assert_eq!(rows[1].label, "Phone");
        assert_eq!(rows[1].amount, 0.0);
    }

    #[test]
    fn older_field_names_are_accepted() {
        let state = migrate(&json!({
            "budget": { "incomeStreams": [{ "id": "i1", "name": "Job", "amount": 100 }] },
            "investments": {
                "holdings": [{ "id": "h1", "label": "Tracker", "invested": 5 }],
                "marketChanges": [{ "id": "c1", "description": "Tracker up", "value": 6 }]
            }
        }));
        assert_eq!(state.budget.income_streams[0].label, "Job");
        assert_eq!(state.budget.income_streams[0].monthly_amount, 100.0);
        assert_eq!(state.investments.holdings[0].name, "Tracker");
        assert_eq!(state.investments.holdings[0].amount, 5.0);
        let change = &state.investments.market_changes[0];
        assert_eq!(change.note, "Tracker up");
        assert_eq!(change.current_value, Some(6.0));
    }
}

// ── Budget ──────────────────────────────────────────────────────────

mod budget {
    use super::*;

    #[test]
    fn legacy_flat_fields_become_items() {
        let state = migrate(&json!({
            "budget": {
                "monthlySpendingBudget": 300,
                "monthlySavingsBudget": "150",
                "monthlyPensionBudget": 80
            }
        }));
        let items = &state.budget.monthly_budget_items;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "budget-item-1");
        assert_eq!(items[0].category, BudgetCategory::Spending);
        assert_eq!(items[0].monthly_amount, 300.0);
        assert_eq!(items[1].category, BudgetCategory::Saving);
        assert_eq!(items[1].monthly_amount, 150.0);
        assert_eq!(items[2].label, "Pension");
        assert_eq!(items[2].category, BudgetCategory::Investing);
    }

    #[test]
    fn legacy_fields_at_root_are_found() {
        let state = migrate(&json!({ "monthlyInvestingBudget": 75 }));
        let items = &state.budget.monthly_budget_items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, BudgetCategory::Investing);
        assert_eq!(items[0].monthly_amount, 75.0);
    }

    #[test]
    fn empty_items_use_template() {
        let state = migrate(&json!({ "budget": { "monthlyBudgetItems": [] } }));
        assert_eq!(state.budget.monthly_budget_items, seed::default_monthly_budget_items());
        assert_eq!(state.budget.monthly_budget_items.len(), 5);
    }

    #[test]
    fn category_inferred_when_tag_is_legacy_or_missing() {
        let state = migrate(&json!({
            "budget": { "monthlyBudgetItems": [
                { "id": "b1", "label": "Pension", "category": "needs", "monthlyAmount": 1 },
                { "id": "b2", "label": "Fun spending", "monthlyAmount": 2 },
                { "id": "b3", "label": "Rainy day", "monthlyAmount": 3 },
                { "id": "b4", "label": "Investing pot", "category": "saving", "monthlyAmount": 4 }
            ]}
        }));
        let categories: Vec<BudgetCategory> = state
            .budget
            .monthly_budget_items
            .iter()
            .map(|item| item.category)
            .collect();
        assert_eq!(
            categories,
            vec![
                BudgetCategory::Investing,
                BudgetCategory::Spending,
                BudgetCategory::Saving,
                BudgetCategory::Saving,
            ]
        );
    }
}

// ── Savings sections ────────────────────────────────────────────────

mod sections {
    use super::*;

    #[test]
    fn legacy_buckets_become_three_sections() {
        let state = migrate(&json!({
            "savings": {
                "primary": { "cashStash": 500, "regularDeposits": [{ "amount": 300 }] },
                "secondary": { "additionalDeposits": [{ "amount": 20 }] },
                "investmentFund": { "regularDeposits": [{ "amount": 333 }] }
            }
        }));
        let sections = &state.savings.sections;
        assert_eq!(sections.len(), 3);
        let tabs: Vec<SectionTab> = sections.iter().map(|s| s.tab).collect();
        assert_eq!(tabs, vec![SectionTab::Savings, SectionTab::Savings, SectionTab::Investments]);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Primary savings", "Secondary savings", "Investments tracker"]);
        assert_eq!(sections[0].bucket.cash_stash, 500.0);
        assert_eq!(sections[1].bucket.additional_deposits[0].amount, 20.0);
        assert_eq!(sections[2].bucket.regular_deposits[0].amount, 333.0);
    }

    #[test]
    fn legacy_buckets_at_root() {
        let state = migrate(&json!({ "investmentFund": { "cashStash": 10 } }));
        let sections = &state.savings.sections;
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].bucket, SavingsBucket::default());
        assert_eq!(sections[2].bucket.cash_stash, 10.0);
    }

    #[test]
    fn single_inline_bucket_becomes_primary() {
        let state = migrate(&json!({
            "savings": { "cashStash": 40, "withdrawals": [{ "amount": 5 }] }
        }));
        let sections = &state.savings.sections;
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].id, seed::PRIMARY_SECTION_ID);
        assert_eq!(sections[0].bucket.cash_stash, 40.0);
        assert_eq!(sections[0].bucket.withdrawals.len(), 1);
        assert!(sections[1].bucket.withdrawals.is_empty());
    }

    #[test]
    fn empty_sections_array_falls_back_to_seed() {
        let state = migrate(&json!({ "savings": { "sections": [] } }));
        assert_eq!(state.savings.sections, seed::default_sections());
    }

    #[test]
    fn section_tab_inferred_from_title() {
        let state = migrate(&json!({
            "savings": { "sections": [
                { "id": "s1", "title": "My Investments", "bucket": {} },
                { "id": "s2", "title": "Invest later", "tab": "savings", "bucket": {} },
                { "id": "s3", "title": "House", "tab": "bogus" }
            ]}
        }));
        let tabs: Vec<SectionTab> = state.savings.sections.iter().map(|s| s.tab).collect();
        assert_eq!(tabs, vec![SectionTab::Investments, SectionTab::Savings, SectionTab::Savings]);
    }

    #[test]
    fn inline_bucket_fields_in_section() {
        let state = migrate(&json!({
            "savings": { "sections": [{ "id": "s1", "title": "Inline", "cashStash": 20 }] }
        }));
        assert_eq!(state.savings.sections[0].bucket.cash_stash, 20.0);
    }

    #[test]
    fn dangling_bucket_links_are_dropped() {
        let state = migrate(&json!({
            "savings": { "sections": [{
                "id": "s1",
                "title": "Fund",
                "bucket": { "marketChanges": [
                    { "id": "c1", "amount": 5, "holdingId": "ghost" },
                    { "id": "c2", "amount": 5, "holdingId": "h1" }
                ]}
            }]},
            "investments": { "holdings": [{ "id": "h1", "name": "Fund" }] }
        }));
        let changes = &state.savings.sections[0].bucket.market_changes;
        assert_eq!(changes[0].holding_id, None);
        assert_eq!(changes[1].holding_id.as_deref(), Some("h1"));
    }
}

// ── Investments ─────────────────────────────────────────────────────

mod investments {
    use super::*;

    #[test]
    fn links_are_inferred_from_notes() {
        let state = migrate(&json!({
            "investments": {
                "holdings": [
                    { "id": "h1", "name": "Global Index " },
                    { "id": "h2", "name": "Bond" }
                ],
                "marketChanges": [
                    { "id": "c1", "note": "GLOBAL INDEX rally" },
                    { "id": "c2", "note": "bond and global index", "holdingId": "missing" },
                    { "id": "c3", "note": "cash interest" },
                    { "id": "c4", "note": "global index", "holdingId": "h2" }
                ]
            }
        }));
        let links: Vec<Option<&str>> = state
            .investments
            .market_changes
            .iter()
            .map(|c| c.holding_id.as_deref())
            .collect();
        assert_eq!(links, vec![Some("h1"), Some("h1"), None, Some("h2")]);
    }

    #[test]
    fn infer_first_match_wins() {
        let holdings = vec![holding("a", "Fund", 0.0), holding("b", "Fund Two", 0.0)];
        assert_eq!(infer_holding_id("fund two update", &holdings), Some("a".into()));
    }

    #[test]
    fn blank_names_never_match() {
        let holdings = vec![holding("a", "   ", 0.0)];
        assert_eq!(infer_holding_id("anything", &holdings), None);
    }

    #[test]
    fn start_date_is_normalized() {
        let state = migrate(&json!({ "investments": { "startDate": "45505" } }));
        assert_eq!(state.investments.start_date, "01/08/2024");
    }
}

// ── Dates ───────────────────────────────────────────────────────────

mod dates {
    use super::*;

    #[test]
    fn each_collection_uses_its_mode() {
        let state = migrate(&json!({
            "budget": {
                "monthlyExpenses": [{ "id": "m", "date": "2024-08-07" }],
                "yearlyExpenses": [{ "id": "y", "date": "2024-03-14" }]
            },
            "savings": { "sections": [{
                "id": "s",
                "title": "S",
                "bucket": {
                    "regularDeposits": [{ "id": "r", "date": "2024-01-05" }],
                    "withdrawals": [{ "id": "w", "date": "45505" }]
                }
            }]},
            "investments": { "marketChanges": [{ "id": "c", "date": "2024-12-31" }] }
        }));
        assert_eq!(state.budget.monthly_expenses[0].date, "07");
        assert_eq!(state.budget.yearly_expenses[0].date, "14/03");
        let bucket = &state.savings.sections[0].bucket;
        assert_eq!(bucket.regular_deposits[0].date, "05/01/2024");
        assert_eq!(bucket.withdrawals[0].date, "01/08/2024");
        assert_eq!(state.investments.market_changes[0].date, "31/12/2024");
    }

    #[test]
    fn numeric_serial_dates_survive() {
        let state = migrate(&json!({
            "budget": { "monthlyExpenses": [{ "id": "m", "date": 7 }] },
            "savings": { "sections": [{
                "id": "s",
                "title": "S",
                "bucket": {
                    "regularDeposits": [{ "id": "r", "date": 45505, "amount": 10 }],
                    "marketChanges": [{ "id": "c", "date": 45505.0 }]
                }
            }]},
            "investments": { "startDate": 45505, "marketChanges": [{ "id": "i", "date": 45292 }] }
        }));
        assert_eq!(state.investments.start_date, "01/08/2024");
        assert_eq!(state.investments.market_changes[0].date, "01/01/2024");
        let bucket = &state.savings.sections[0].bucket;
        assert_eq!(bucket.regular_deposits[0].date, "01/08/2024");
        assert_eq!(bucket.market_changes[0].date, "01/08/2024");
        assert_eq!(state.budget.monthly_expenses[0].date, "07");
        assert_eq!(remigrate(&state), state);
    }

    #[test]
    fn date_text_coercion() {
        assert_eq!(to_date_text(Some(&json!(45505))), "45505");
        assert_eq!(to_date_text(Some(&json!(45505.0))), "45505");
        assert_eq!(to_date_text(Some(&json!("01/08/2024"))), "01/08/2024");
        assert_eq!(to_date_text(Some(&json!(45505.5))), "");
        assert_eq!(to_date_text(Some(&json!(-3))), "");
        assert_eq!(to_date_text(Some(&json!(true))), "");
        assert_eq!(to_date_text(None), "");
    }

    #[test]
    fn invalid_day_becomes_empty() {
        let state = migrate(&json!({
            "budget": { "monthlyExpenses": [{ "id": "m", "date": "45" }] }
        }));
        assert_eq!(state.budget.monthly_expenses[0].date, "");
    }
}
