use crate::infra::{in_memory_ledger, parse_cli_timestamp, Ledger};
use chrono::{Duration, NaiveDateTime};
use clap::Args;
use employee_points::config::LedgerConfig;
use employee_points::error::AppError;
use employee_points::points::views::{outcome_view, PeriodView, PointTotalsView};
use employee_points::points::{LedgerError, NewApplication, NewEmployee, NewPeriod, NewPoint};
use serde::Serialize;

const DEMO_EMPLOYEES: [&str; 3] = ["Alice", "Bob", "Carol"];
const DEMO_APPLICATIONS: [&str; 2] = ["Storefront", "Billing"];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Period start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_parser = parse_cli_timestamp, default_value = "2024-03-01")]
    pub(crate) period_start: NaiveDateTime,
    /// Period end. Defaults to period_start + 30 days.
    #[arg(long, value_parser = parse_cli_timestamp)]
    pub(crate) period_end: Option<NaiveDateTime>,
    /// Seed for breaking ties between leaders, for a repeatable winner.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Give every employee the same number of points so the winner is drawn.
    #[arg(long)]
    pub(crate) tied: bool,
}

#[derive(Debug, Serialize)]
struct DemoReport {
    totals: PointTotalsView,
    period: PeriodView,
    summary: String,
    tied_leaders: usize,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let ledger = in_memory_ledger(&LedgerConfig {
        tie_break_seed: args.seed,
    });

    let start = args.period_start;
    let end = args.period_end.unwrap_or(start + Duration::days(30));

    seed_ledger(&ledger, start, end, args.tied)?;

    let outcome = ledger.evaluate_period("Demo period")?;
    let report = DemoReport {
        totals: PointTotalsView::from(&ledger.all_totals(Some(start), Some(end))?),
        period: outcome_view(&outcome),
        summary: outcome.summary(),
        tied_leaders: outcome.tied,
    };

    println!("Employee points demo");
    println!("  {}", report.summary);
    match serde_json::to_string_pretty(&report) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => println!("  Unable to render report: {err}"),
    }
    Ok(())
}

/// Register the demo roster and spread points over the period. Carol trails
/// unless `tied` is set, in which case all three finish level.
fn seed_ledger(
    ledger: &Ledger,
    start: NaiveDateTime,
    end: NaiveDateTime,
    tied: bool,
) -> Result<(), LedgerError> {
    for name in DEMO_EMPLOYEES {
        ledger.add_employee(NewEmployee {
            name: name.to_string(),
            active: true,
        })?;
    }
    for name in DEMO_APPLICATIONS {
        ledger.add_application(NewApplication {
            name: name.to_string(),
        })?;
    }

    let awards: [(&str, i64); 3] = if tied {
        [("Alice", 3), ("Bob", 3), ("Carol", 3)]
    } else {
        [("Alice", 4), ("Bob", 4), ("Carol", 2)]
    };
    for (employee, count) in awards {
        for n in 0..count {
            ledger.add_point(NewPoint {
                date_earned: start + Duration::days(n + 1),
                employee_name: employee.to_string(),
                application_name: DEMO_APPLICATIONS[(n as usize) % DEMO_APPLICATIONS.len()]
                    .to_string(),
                description: format!("fix #{} for {employee}", n + 1),
                prod_env: n % 2 == 0,
            })?;
        }
    }

    ledger.add_period(NewPeriod {
        periodname: "Demo period".to_string(),
        startdate: start,
        enddate: end,
    })?;
    Ok(())
}
