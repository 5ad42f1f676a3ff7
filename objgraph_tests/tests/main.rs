use anyhow::Result;

mod graphs;
mod params;

#[test]
fn integration_test_board() -> Result<()> {
    graphs::board_round_trip()?;
    graphs::decoded_graphs_are_independent()?;
    graphs::schema_free_view()?;
    Ok(())
}

#[test]
fn integration_test_threads() -> Result<()> {
    graphs::pairings_cross_threads()
}

#[test]
fn integration_test_limits() -> Result<()> {
    graphs::configured_limits()?;
    params::params_respect_codec_limits()?;
    Ok(())
}

#[test]
fn integration_test_params() -> Result<()> {
    params::params_persist_and_reload()
}
