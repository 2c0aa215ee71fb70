use cmexport::config::Config;
use cmexport::history::export_history;
use cmexport::name::Name;
use cmexport::repo::Repository;
use failure::{err_msg, Fallible};
use log::info;
use std::env;
use std::io::{self, BufWriter};

fn main() -> Fallible<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        return Err(err_msg(
            "usage: cmexport <config.json> <repository.json> <project>...",
        ));
    }

    let config = Config::load(&args[1])?;
    let repo = Repository::load(&args[2])?;
    let projects = args[3..]
        .iter()
        .map(|p| Name::parse(p))
        .collect::<Fallible<Vec<_>>>()?;
    info!("exporting {} projects to {}", projects.len(), config.branch);

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    export_history(&repo, &config, &projects, out)?;
    Ok(())
}
