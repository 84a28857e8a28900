mod options;

use std::process::exit;
use std::rc::Rc;

use itertools::Itertools;
pub use options::HexShellOptions;

use crate::hex::prelude::*;
use crate::solver::prelude::*;
use crate::utils::prelude::*;

/// Notates a colour the long way (`black`/`white`), the form the control
/// surface's tokens use, as distinct from `Color::notate`'s single-letter
/// shorthand used for board printing.
fn long_notate(color: Color) -> &'static str {
    match color {
        Color::Black => "black",
        Color::White => "white",
        _ => "none",
    }
}

/// The line-oriented command loop driving the Hex solver: reads one command
/// per line from stdin, applies it against the current board, and prints
/// its result to stdout. Structurally this mirrors a turn-based engine
/// shell (read line, split into tokens, dispatch by name, log failures);
/// the command set itself is Hex's own (board setup, play/undo, solve, the
/// ICE/solver parameter knobs).
pub struct HexShell {
    options: HexShellOptions,
    config: SolverConfig,
    board: Option<HexBoard>,
    tt: TransTable<DfsData>,
    db: Option<PositionDb>,
}

impl HexShell {
    pub fn new(options: HexShellOptions) -> HexShell {
        let config = options.solver_config();
        let tt_size = options.tt_size.unwrap_or(1 << 20);
        HexShell { options, config, board: None, tt: TransTable::new(tt_size), db: None }
    }

    /// Runs the shell until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        if let Some(path) = self.options.db_path.clone() {
            match PositionDb::open(&path) {
                Ok(db) => self.db = Some(db),
                Err(e) => log::warn!("could not open position db {path}: {e}"),
            }
        }
        let (width, height) = self.options.parse_board_size();
        let (width_str, height_str) = (width.to_string(), height.to_string());
        self.set_board_size(&[width_str.as_str(), height_str.as_str()])?;

        loop {
            let mut cmdstr = String::new();
            let read = std::io::stdin().read_line(&mut cmdstr)?;
            if read == 0 {
                return Ok(());
            }

            let args: Vec<&str> = cmdstr.split_whitespace().collect();
            let cmd = *args.first().unwrap_or(&"");
            self.apply(cmd, &args[1..]);
        }
    }

    /// Runs a single command, logging (not propagating) any error so the
    /// loop keeps running after a bad command.
    fn apply(&mut self, cmd: &str, args: &[&str]) {
        let result = match cmd {
            "" => Ok(()),
            "boardsize" => self.set_board_size(args),
            "play" => self.play(args),
            "undo" => self.undo(args),
            "solve-state" => self.solve_state(args),
            "genmove" => self.genmove(args),
            "param_solver_ice" => self.param_solver_ice(args),
            "param_solver" => self.param_solver(args),
            "showboard" => self.showboard(args),
            "quit" => exit(0),
            _ => Err(anyhow!("unrecognized command {cmd}")),
        };

        if let Err(err) = result {
            log::warn!("command {cmd} failed: {err}");
            println!("? {err}");
        }
    }

    fn set_board_size(&mut self, args: &[&str]) -> Result<()> {
        if args.len() < 2 {
            return Err(anyhow!("boardsize requires a width and a height"));
        }
        let width: usize = args[0].parse().map_err(|_| anyhow!("invalid width {}", args[0]))?;
        let height: usize = args[1].parse().map_err(|_| anyhow!("invalid height {}", args[1]))?;

        let geometry = Rc::new(Geometry::new(width, height));
        let mut board = HexBoard::new(geometry, self.config.ice);
        board.set_backup_ice_info(self.config.backup_ice_info);
        board.compute_all(Color::Black);
        self.board = Some(board);
        self.tt.clear();

        println!("{width}x{height}");
        Ok(())
    }

    fn ensure_started(&mut self) -> Result<&mut HexBoard> {
        self.board.as_mut().ok_or_else(|| anyhow!("no board set; run boardsize first"))
    }

    fn play(&mut self, args: &[&str]) -> Result<()> {
        if args.len() < 2 {
            return Err(anyhow!("play requires a colour and a cell"));
        }
        let color = Color::parse(args[0])?;
        let board = self.ensure_started()?;
        let cell = board.geometry().parse(args[1])?;
        if !board.board().is_empty(cell) {
            return Err(anyhow!("cell {} is already occupied", args[1]));
        }
        board.play_move(color, cell);
        println!("{}", args[1]);
        Ok(())
    }

    fn undo(&mut self, _args: &[&str]) -> Result<()> {
        let board = self.ensure_started()?;
        if !board.undo_move() {
            return Err(anyhow!("no move to undo"));
        }
        println!("undo");
        Ok(())
    }

    fn solve_state(&mut self, args: &[&str]) -> Result<()> {
        if args.is_empty() {
            return Err(anyhow!("solve-state requires a colour"));
        }
        let color = Color::parse(args[0])?;
        let board = self.board.as_mut().ok_or_else(|| anyhow!("no board set; run boardsize first"))?;

        let mut solver = DfsSolver::new(self.config, &mut self.tt, self.db.as_mut());
        let result = solver.solve(board, color);

        let winner = match result.outcome {
            SolveOutcome::Win => long_notate(color),
            SolveOutcome::Loss => long_notate(-color),
            SolveOutcome::Unknown => "unknown",
        };
        println!("{winner}");
        Ok(())
    }

    fn genmove(&mut self, args: &[&str]) -> Result<()> {
        if args.is_empty() {
            return Err(anyhow!("genmove requires a colour"));
        }
        let color = Color::parse(args[0])?;
        let board = self.board.as_mut().ok_or_else(|| anyhow!("no board set; run boardsize first"))?;

        let mut solver = DfsSolver::new(self.config, &mut self.tt, self.db.as_mut());
        let result = solver.solve(board, color);

        let geometry = board.geometry().clone();
        let chosen = match result.outcome {
            SolveOutcome::Win => result.principal_variation.first().copied(),
            _ => board.playable_cells().iter().next(),
        };
        let Some(cell) = chosen else {
            return Err(anyhow!("no legal move available"));
        };

        let line = result.principal_variation.iter().map(|&p| geometry.notate(p)).join(" ");
        log::debug!("genmove {}: principal variation {line}", args[0]);

        println!("{}", geometry.notate(cell));
        Ok(())
    }

    fn param_solver_ice(&mut self, args: &[&str]) -> Result<()> {
        if args.len() < 2 {
            return Err(anyhow!("param_solver_ice requires a key and a value"));
        }
        self.config.set_ice_param(args[0], args[1])?;
        if let Some(board) = self.board.as_mut() {
            board.set_ice_config(self.config.ice);
        }
        Ok(())
    }

    fn param_solver(&mut self, args: &[&str]) -> Result<()> {
        if args.len() < 2 {
            return Err(anyhow!("param_solver requires a key and a value"));
        }
        self.config.set_solver_param(args[0], args[1])?;
        if let Some(board) = self.board.as_mut() {
            board.set_backup_ice_info(self.config.backup_ice_info);
        }
        Ok(())
    }

    fn showboard(&mut self, _args: &[&str]) -> Result<()> {
        let board = self.ensure_started()?;
        let geometry = board.geometry().clone();
        for r in 0..geometry.height {
            let indent = " ".repeat(r);
            let row = (0..geometry.width).map(|c| board.board().color_at(geometry.cell(r, c)).notate()).join(" ");
            println!("{indent}{row}");
        }
        Ok(())
    }
}
