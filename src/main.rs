use std::{env, fs, process};

use kit::runtime::command::CmdId;
use kit::runtime::interpreter::Interpreter;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => print_help(),
        "-e" => {
            if args.len() < 3 {
                eprintln!("Usage: kit -e <program>");
                process::exit(1);
            }
            run(&args[2]);
        }
        path => {
            if args.len() > 2 {
                eprintln!("Too many arguments.");
                process::exit(1);
            }
            match fs::read_to_string(path) {
                Ok(source) => run(&source),
                Err(err) => {
                    eprintln!("Failed to read given file: {}", err);
                    process::exit(1);
                }
            }
        }
    }
}

fn run(program: &str) {
    let mut interp = Interpreter::new();
    match interp.execute(program) {
        Ok((res, last)) => {
            // print/puts already wrote its output; don't echo it twice.
            if last != Some(CmdId::Print) {
                match res {
                    Some(value) => println!("{}", value),
                    None => println!(),
                }
            }
        }
        Err(err) => {
            eprintln!("Script failed with: {}", err);
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("Usage: kit <script>");
    println!("       kit -e <program>");
    println!();
    println!("Runs a Kit program and prints its final result.");
}
