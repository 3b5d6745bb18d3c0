// This file is part of tournament-engine.
//
// tournament-engine is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// tournament-engine is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

mod command_line;

use std::io;

use clap::Parser;
use log::info;
use tournament_engine::{
    handle::TournamentHandle,
    message::Message,
    service::TournamentService,
    store::{MemoryStore, RonStore, TournamentStore},
    utils::{TOURNAMENTS_FILE, create_data_folder, data_file, init_logger},
};

use crate::command_line::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.debug, args.systemd);

    if args.man {
        return Args::generate_man_page();
    }

    if args.skip_the_data_file {
        return run(MemoryStore::default(), args.seed);
    }

    let path = if let Some(path) = args.data_file {
        path
    } else {
        create_data_folder()?;
        data_file(TOURNAMENTS_FILE)
    };
    info!("data file: {}", path.display());

    run(RonStore::new(path), args.seed)
}

fn run<S: TournamentStore + Send + 'static>(store: S, seed: bool) -> anyhow::Result<()> {
    let mut service = TournamentService::new(store)?;
    if seed {
        service.seed_if_empty();
    }

    let (handle, thread) = TournamentHandle::spawn(service);
    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        match stdin.read_line(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                println!("? {error}\n");
                break;
            }
        }

        match Message::read_line(&buffer).and_then(|message| handle.update(message)) {
            Err(error) => println!("? {error}\n"),
            Ok(Some(reply)) => println!("= {reply}\n"),
            Ok(None) => {}
        }
    }

    drop(handle);
    thread
        .join()
        .map_err(|_| anyhow::Error::msg("the tournament service panicked"))
}
