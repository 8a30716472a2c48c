use minegrid::{Action, CellStatus, Difficulty, Game, GameError, GameEvent, GameStatus, Position};
use std::io::{self, Write};

fn main() {
    match run_game() {
        Ok(_) => println!("Thanks for playing!"),
        Err(e) => eprintln!("Game error: {}", e),
    }
}

fn run_game() -> Result<(), GameError> {
    let difficulty = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<Difficulty>())
        .transpose()?
        .unwrap_or(Difficulty::Easy);

    let mut game = Game::new(10, 10, difficulty)?;
    println!(
        "10x10 board, difficulty {} ({} mines)",
        difficulty,
        game.board().mine_count()
    );

    while game.status() == GameStatus::Playing {
        print_board(&game);

        if let Some((pos, action)) = get_user_input(&game) {
            if let Err(e) = game.perform_action(pos, action) {
                println!("Error: {}", e);
                continue;
            }
        }

        for event in game.take_events() {
            match event {
                GameEvent::FloodTilesRevealed { tiles } => {
                    println!("Cleared {} tiles", tiles.len())
                }
                GameEvent::GameWon => println!("Congratulations! You won!"),
                GameEvent::GameLost => println!("Game Over!"),
                GameEvent::TileRevealed { .. } | GameEvent::FlagToggled { .. } => {}
            }
        }
    }

    print_board(&game);
    Ok(())
}

fn print_board(game: &Game) {
    let (rows, cols) = game.dimensions();

    // Print column numbers
    print!("  ");
    for col in 0..cols {
        print!("{} ", col);
    }
    println!();

    // Print rows
    for row in 0..rows {
        print!("{} ", row);
        for col in 0..cols {
            let pos = Position::new(row as i32, col as i32);
            let cell = game.cell(pos).expect("in bounds");
            match cell.status() {
                CellStatus::Hidden => print!("□ "),
                CellStatus::Flagged => print!("⚑ "),
                CellStatus::WrongFlag => print!("✗ "),
                CellStatus::Revealed if cell.is_mine() => print!("✸ "),
                CellStatus::Revealed => match cell.adjacent_mines() {
                    0 => print!("  "),
                    n => print!("{} ", n),
                },
            }
        }
        println!();
    }
}

fn get_user_input(game: &Game) -> Option<(Position, Action)> {
    print!("Enter command (row col [r/f]): ");
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).ok()?;

    let mut parts = input.split_whitespace();

    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    let action = parts.next()?.chars().next()?;

    let pos = Position::new(row, col);

    if game.cell(pos).is_err() {
        println!("Position out of bounds");
        return None;
    }

    let action = match action {
        'r' => Some(Action::Reveal),
        'f' => Some(Action::Flag),
        _ => {
            println!("Invalid action. Use 'r' to reveal or 'f' to flag");
            None
        }
    }?;

    Some((pos, action))
}
