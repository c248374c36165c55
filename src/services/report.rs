//! Console rendering of search results.

use chrono::{DateTime, Local};

use crate::models::{Center, District, State};

const RULE_WIDTH: usize = 50;

/// Render matching centers as a framed, numbered block.
pub fn render_centers(centers: &[Center], at: DateTime<Local>) -> String {
    let rule = "*".repeat(RULE_WIDTH);
    let mut out = format!(
        "{}\n{} Centers found at {}\n",
        rule,
        centers.len(),
        at.format("%d-%m-%Y %I:%M:%S %p")
    );

    for (i, center) in centers.iter().enumerate() {
        out.push_str(&render_center(i + 1, center));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

fn render_center(number: usize, center: &Center) -> String {
    let mut out = format!(
        "{}.\nName:{}\nAddress:{}\nblock_name:{}\npincode:{}\nCenter timing:{} to {}\nFee:{}\n\tSessions:\n",
        number,
        center.name,
        center.address,
        center.block_name,
        center.pincode,
        center.from,
        center.to,
        center.fee_type
    );

    for (j, session) in center.sessions.iter().enumerate() {
        out.push_str(&format!(
            "\t{}.\tDate:{}\tAvailability:{}\tAge Limit:{}\tVaccine:{}\n",
            j + 1,
            session.date,
            session.available_capacity,
            session.min_age_limit,
            session.vaccine
        ));
    }

    out.push('\n');
    out
}

/// Print matching centers to stdout, stamped with the current time.
pub fn print_centers(centers: &[Center]) {
    print!("{}", render_centers(centers, Local::now()));
}

pub fn render_states(states: &[State]) -> String {
    states
        .iter()
        .map(|s| format!("{:>4}  {}\n", s.state_id, s.state_name))
        .collect()
}

pub fn render_districts(districts: &[District]) -> String {
    districts
        .iter()
        .map(|d| format!("{:>4}  {}\n", d.district_id, d.district_name))
        .collect()
}
