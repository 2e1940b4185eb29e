use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let app = scenelab::default()?;
    app.run()
}
