//! Tables and views printed by the commands.

use std::io;

use steamline::{
    catalog::Service,
    dashboard::DashboardSnapshot,
    money::format_rupiah,
    orders::Order,
    receipt::Receipt,
    roles::User,
    status::StageState,
    timestamps,
    tracking::{TrackingSnapshot, TrackingState},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Rows},
};

fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();

    builder.push_record(header.iter().copied());

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());

    table.to_string()
}

pub(crate) fn orders(orders: &[Order]) -> String {
    table(
        &["Order", "Customer", "Status", "Payment", "Total", "Created"],
        orders
            .iter()
            .map(|order| {
                vec![
                    order.reference(),
                    order.customer_name.clone().unwrap_or_else(|| "-".to_string()),
                    order.status.label().to_string(),
                    order.payment_status.to_string(),
                    format_rupiah(order.total_price),
                    timestamps::display(order.created_at.as_deref()),
                ]
            })
            .collect(),
    )
}

pub(crate) fn tasks(tasks: &[Order]) -> String {
    table(
        &["Order", "Customer", "Phone", "Status", "Next step"],
        tasks
            .iter()
            .map(|task| {
                vec![
                    task.reference(),
                    task.customer_name.clone().unwrap_or_else(|| "-".to_string()),
                    task.customer_phone.clone().unwrap_or_else(|| "-".to_string()),
                    task.status.label().to_string(),
                    task.delivery_action().label().to_string(),
                ]
            })
            .collect(),
    )
}

pub(crate) fn services(services: &[Service]) -> String {
    table(
        &["Id", "Service", "Unit", "Price"],
        services
            .iter()
            .map(|service| {
                vec![
                    service.id.to_string(),
                    service.name.clone(),
                    service.unit.clone(),
                    format_rupiah(service.price),
                ]
            })
            .collect(),
    )
}

pub(crate) fn users(users: &[User]) -> String {
    table(
        &["Id", "Username", "Name", "Phone", "Role"],
        users
            .iter()
            .map(|user| {
                vec![
                    user.id.to_string(),
                    user.username.clone(),
                    user.display_name().to_string(),
                    user.phone.clone().unwrap_or_else(|| "-".to_string()),
                    user.role.to_string(),
                ]
            })
            .collect(),
    )
}

pub(crate) fn dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = table(
        &["Statistic", "Value"],
        snapshot
            .cards()
            .into_iter()
            .map(|card| vec![card.label.to_string(), card.value.render()])
            .collect(),
    );

    if !snapshot.chart_data.is_empty() {
        out.push('\n');
        out.push_str(&table(
            &["Date", "Orders"],
            snapshot
                .chart_data
                .iter()
                .map(|point| vec![point.date.clone(), point.count.to_string()])
                .collect(),
        ));
    }

    if !snapshot.recent_activities.is_empty() {
        out.push_str("\nRecent activity\n");
        out.push_str(&orders(&snapshot.recent_activities));
    }

    out
}

pub(crate) fn tracking(state: &TrackingState) -> String {
    let mut out = String::new();

    if let Some(message) = state.error() {
        out.push_str(&format!("! {message}\n"));
    }

    match state.data() {
        Some(snapshot) => out.push_str(&snapshot_view(snapshot)),
        None if state.is_fetching() => out.push_str("Loading...\n"),
        None => {}
    }

    out
}

fn snapshot_view(snapshot: &TrackingSnapshot) -> String {
    let order = &snapshot.order;
    let progress = snapshot.progress();

    let mut out = format!(
        "{}  {}  ({})\n",
        order.reference(),
        order.status.label(),
        order.payment_status
    );

    for stage in &progress.stages {
        let marker = match stage.state {
            StageState::Completed => "[x]",
            StageState::Current => "[>]",
            StageState::Upcoming => "[ ]",
        };

        out.push_str(&format!("  {marker} {}\n", stage.stage.label()));
    }

    if !snapshot.items.is_empty() {
        out.push_str(&table(
            &["Service", "Qty", "Subtotal"],
            snapshot
                .items
                .iter()
                .map(|item| {
                    vec![
                        item.service_name.clone(),
                        match &item.unit {
                            Some(unit) => format!("{} {unit}", item.quantity.normalize()),
                            None => item.quantity.normalize().to_string(),
                        },
                        format_rupiah(item.subtotal),
                    ]
                })
                .collect(),
        ));
        out.push('\n');
    }

    out.push_str("History\n");

    for entry in &snapshot.logs {
        out.push_str(&format!(
            "  {}  {}\n",
            timestamps::display(entry.created_at.as_deref()),
            entry.message()
        ));
    }

    out
}

pub(crate) fn receipt(receipt: &Receipt) -> Result<(), String> {
    receipt
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print receipt: {error}"))
}
