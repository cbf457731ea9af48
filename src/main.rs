use align_coach_lib::commands::{planning, program};

/// Print the week and today's plan as JSON
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let state = align_coach_lib::run().await?;

  let week = program::get_full_week(&state).await?;
  let today = planning::get_day_overview(&state).await?;
  let blocks = program::get_session_blocks(&state).await?;

  let report = serde_json::json!({
    "week": week,
    "today": today,
    "blocks": blocks,
  });
  println!("{}", serde_json::to_string_pretty(&report)?);

  state.store.pool().close().await;
  Ok(())
}
