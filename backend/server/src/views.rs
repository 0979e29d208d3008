use minijinja::Environment;

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const RESULT_TEMPLATE: &str = include_str!("../templates/result.html");
const LEADERBOARD_TEMPLATE: &str = include_str!("../templates/leaderboard.html");

pub const INDEX: &str = "index.html";
pub const RESULT: &str = "result.html";
pub const LEADERBOARD: &str = "leaderboard.html";

pub const NO_DATA_MESSAGE: &str = "No data for that day.";

/// Page templates, compiled into the binary. The `.html` names turn on
/// auto-escaping.
pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut templates = Environment::new();
    templates.add_template("base.html", BASE_TEMPLATE)?;
    templates.add_template(INDEX, INDEX_TEMPLATE)?;
    templates.add_template(RESULT, RESULT_TEMPLATE)?;
    templates.add_template(LEADERBOARD, LEADERBOARD_TEMPLATE)?;

    Ok(templates)
}
