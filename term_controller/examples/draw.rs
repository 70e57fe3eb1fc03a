// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mouse drawing demo.
//!
//! - Left drag draws, right drag erases.
//! - Typing a character makes it the brush.
//! - Double click clears the screen.
//! - `ctrl_x ctrl_p` pauses the controller and asks a question on the normal terminal.
//! - `ctrl_c` quits.
//!
//! Logs go to `term_controller_log.txt`, stdout belongs to the drawing.

use crossterm::{cursor::MoveTo,
                queue,
                style::Print,
                terminal::{Clear, ClearType}};
use r3bl_term_controller::{BindingTable, CommandArg, HandlerTable, PauseInterrupt,
                           TermController, TermControllerConfig, TracingConfig,
                           init_tracing};
use std::io::{ErrorKind, Write as _, stdout};

const LEFT_BUTTON: i64 = 0;
const RIGHT_BUTTON: i64 = 2;
const BUTTON_MASK: i64 = 0b11;

#[derive(Debug)]
struct Canvas {
    brush: String,
    pen: Option<i64>,
}

impl Canvas {
    fn plot(&self, args: &[CommandArg], erase: bool) {
        let (Some(col), Some(row)) = (
            args.get(1).and_then(CommandArg::as_int),
            args.get(2).and_then(CommandArg::as_int),
        ) else {
            return;
        };
        // Mouse coordinates are 1 based.
        let col = u16::try_from(col.saturating_sub(1)).unwrap_or_default();
        let row = u16::try_from(row.saturating_sub(1)).unwrap_or_default();
        let glyph = if erase { " " } else { self.brush.as_str() };

        let mut out = stdout();
        let result = queue!(out, MoveTo(col, row), Print(glyph)).and_then(|()| out.flush());
        if let Err(err) = result {
            tracing::warn!(message = "Failed to draw.", error = ?err);
        }
    }
}

fn clear_screen() {
    let mut out = stdout();
    let result = queue!(out, Clear(ClearType::All), MoveTo(0, 0)).and_then(|()| out.flush());
    if let Err(err) = result {
        tracing::warn!(message = "Failed to clear screen.", error = ?err);
    }
}

fn button(args: &[CommandArg]) -> Option<i64> {
    args.first()
        .and_then(CommandArg::as_int)
        .map(|flags| flags & BUTTON_MASK)
}

fn on_mouse_down(canvas: &mut Canvas, args: &[CommandArg]) {
    canvas.pen = button(args);
    canvas.plot(args, canvas.pen == Some(RIGHT_BUTTON));
}

fn on_mouse_move(canvas: &mut Canvas, args: &[CommandArg]) {
    match canvas.pen {
        Some(LEFT_BUTTON) => canvas.plot(args, false),
        Some(RIGHT_BUTTON) => canvas.plot(args, true),
        _ => {}
    }
}

fn on_mouse_click(canvas: &mut Canvas, _args: &[CommandArg]) { canvas.pen = None; }

fn on_mouse_doubleclick(canvas: &mut Canvas, _args: &[CommandArg]) {
    canvas.pen = None;
    clear_screen();
}

fn on_insert_char(canvas: &mut Canvas, args: &[CommandArg]) {
    if let Some(text) = args.first().and_then(CommandArg::as_text) {
        canvas.brush = text.to_string();
        tracing::debug!(message = "Brush changed.", brush = %canvas.brush);
    }
}

fn on_resize(_canvas: &mut Canvas, _args: &[CommandArg]) { clear_screen(); }

fn main() -> miette::Result<()> {
    init_tracing(TracingConfig::new_file(None, tracing::Level::DEBUG))?;

    let bindings = BindingTable::new()
        .bind("ctrl_c", "quit")
        .bind_chord("ctrl_x", BindingTable::new().bind("ctrl_p", "ask"));

    let canvas = HandlerTable::new(Canvas {
        brush: "*".into(),
        pen: None,
    })
    .on("mouse_down", on_mouse_down)
    .on("mouse_move", on_mouse_move)
    .on("mouse_click", on_mouse_click)
    .on("mouse_doubleclick", on_mouse_doubleclick)
    .on("insert_char", on_insert_char)
    .on("resize", on_resize)
    .on("resume", on_resize);

    let mut controller = TermController::try_new(
        TermControllerConfig::default().with_hide_cursor(true),
        bindings,
        Some(Box::new(canvas)),
    )?;
    clear_screen();

    while let Some(command) = controller.handle_input() {
        match command.name().as_str() {
            "quit" => break,
            "ask" => {
                let answer = controller.pause_interruptible(ask_name);
                tracing::debug!(message = "Paused prompt done.", answer = ?answer);
                if controller.pause_interrupted() {
                    break;
                }
                clear_screen();
            }
            _ => {}
        }
        if let Some(label) = controller.diagnostics().last_command() {
            tracing::debug!(message = "Last command.", label = %label);
        }
    }

    drop(controller);
    clear_screen();
    println!("Goodbye!");
    Ok(())
}

/// Runs with the terminal restored, so the normal line editor applies. `ctrl_c` is
/// only seen once the line is entered.
fn ask_name(interrupt: &PauseInterrupt<'_>) -> std::io::Result<String> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0), Print("Your name? "))?;
    out.flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    if interrupt.is_interrupted() {
        return Err(ErrorKind::Interrupted.into());
    }
    Ok(line.trim().to_string())
}
