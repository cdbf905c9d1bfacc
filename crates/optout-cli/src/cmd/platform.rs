use crate::output::print_json;
use optout_core::platform::Platform;

pub fn run(json: bool) -> anyhow::Result<()> {
    let platform = Platform::detect();
    if json {
        return print_json(&serde_json::json!({ "platform": platform }));
    }
    println!("{platform}");
    Ok(())
}
