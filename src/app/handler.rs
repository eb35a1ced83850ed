//! Command execution — glue between the store, the naming policy and the
//! shell injector.
//!
//! Every handler writes its user-visible output to `ctx.out`.  Not-found,
//! invalid and reserved names are reported there as one line and count as
//! success; only store corruption and I/O failures propagate.

use std::io::Write;

use super::command::Command;
use crate::core::policy::{self, Confirm, NameApproval};
use crate::core::store::Store;
use crate::error::{Result, WaypointError};
use crate::shell::inject::ShellInjector;

pub const HINT: &str = "Confused? Run with 'help'.";

/// Printed after a reserved name has been stored on confirmation.
pub const RESERVED_CAVEAT: &str =
    "Note: 'wp <name>' will not reach this waypoint; use 'wp go <name>'.";

/// Everything a handler may touch.
pub struct Context<'a, W: Write> {
    pub store: &'a Store,
    pub injector: &'a dyn ShellInjector,
    pub confirm: &'a mut dyn Confirm,
    pub out: W,
}

/// Run `command`, turning user-facing errors into a printed line.
pub fn handle<W: Write>(ctx: &mut Context<'_, W>, command: Command) -> Result<()> {
    tracing::debug!("handling {}", command.verb());
    match dispatch(ctx, command) {
        Err(e) if e.is_user_facing() => {
            tracing::debug!("{e:?}");
            say(&mut ctx.out, &e.to_string())
        }
        other => other,
    }
}

fn dispatch<W: Write>(ctx: &mut Context<'_, W>, command: Command) -> Result<()> {
    match command {
        Command::Go { name } => go(ctx, &name),
        Command::Set { name, path } => {
            let path = path.to_str().ok_or_else(|| {
                WaypointError::InvalidArgument("path is not valid UTF-8".into())
            })?;
            set(ctx, &name, path)
        }
        Command::Rem { name } => rem(ctx, &name),
        Command::Peek { name } => peek(ctx, &name),
        Command::Ls => ls(ctx),
        Command::Hint => say(&mut ctx.out, HINT),
    }
}

fn say(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{line}").map_err(|e| WaypointError::io("writing output", e))
}

// ───────────────────────────────────────── commands ──────────

fn go<W: Write>(ctx: &mut Context<'_, W>, name: &str) -> Result<()> {
    let waypoints = ctx.store.load()?;
    let path = waypoints.get(name)?;
    tracing::debug!("go {name} -> {path}");
    ctx.out
        .flush()
        .map_err(|e| WaypointError::io("writing output", e))?;
    ctx.injector.change_directory(path);
    Ok(())
}

fn set<W: Write>(ctx: &mut Context<'_, W>, name: &str, path: &str) -> Result<()> {
    // Ask before taking the store lock.
    let approval = policy::approve_name(name, &mut *ctx.confirm)?;
    ctx.store.update(|wp| wp.set(name, path))?;
    tracing::debug!("set {name} -> {path}");
    if approval == NameApproval::ReservedOverride {
        say(&mut ctx.out, RESERVED_CAVEAT)?;
    }
    Ok(())
}

fn rem<W: Write>(ctx: &mut Context<'_, W>, name: &str) -> Result<()> {
    let old = ctx.store.update(|wp| wp.remove(name))?;
    tracing::debug!("rem {name} (was {old})");
    Ok(())
}

fn peek<W: Write>(ctx: &mut Context<'_, W>, name: &str) -> Result<()> {
    let waypoints = ctx.store.load()?;
    let path = waypoints.get(name)?;
    say(&mut ctx.out, path)
}

fn ls<W: Write>(ctx: &mut Context<'_, W>) -> Result<()> {
    let waypoints = ctx.store.load()?;
    for name in waypoints.list() {
        say(&mut ctx.out, name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;

    #[derive(Default)]
    struct Recording(RefCell<Vec<String>>);

    impl ShellInjector for Recording {
        fn try_inject(&self, command_line: &str) -> Result<()> {
            self.0.borrow_mut().push(command_line.to_string());
            Ok(())
        }
    }

    fn run(store: &Store, injector: &Recording, answer: bool, command: Command) -> String {
        let mut confirm = move |_: &str| answer;
        let mut out = Vec::new();
        let mut ctx = Context {
            store,
            injector,
            confirm: &mut confirm,
            out: &mut out,
        };
        handle(&mut ctx, command).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("waypoint.db")).unwrap();
        (dir, store)
    }

    fn set_cmd(name: &str, path: &str) -> Command {
        Command::Set {
            name: name.into(),
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn go_injects_quoted_cd() {
        let (_dir, store) = store();
        let inj = Recording::default();
        run(&store, &inj, false, set_cmd("p", "/tmp/a b"));
        let out = run(&store, &inj, false, Command::Go { name: "p".into() });
        assert_eq!(out, "");
        assert_eq!(*inj.0.borrow(), vec!["cd '/tmp/a b'\n"]);
    }

    #[test]
    fn go_unknown_prints_message_and_does_not_inject() {
        let (_dir, store) = store();
        let inj = Recording::default();
        let out = run(&store, &inj, false, Command::Go { name: "nope".into() });
        assert_eq!(out, "No such waypoint!\n");
        assert!(inj.0.borrow().is_empty());
    }

    #[test]
    fn reserved_name_declined_leaves_store_unchanged() {
        let (_dir, store) = store();
        let inj = Recording::default();
        let out = run(&store, &inj, false, set_cmd("go", "/x"));
        assert!(out.starts_with("Unallowed waypoint name"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn reserved_name_confirmed_is_stored_with_caveat() {
        let (_dir, store) = store();
        let inj = Recording::default();
        let out = run(&store, &inj, true, set_cmd("ls", "/x"));
        assert_eq!(out, format!("{RESERVED_CAVEAT}\n"));
        assert_eq!(store.load().unwrap().get("ls").unwrap(), "/x");
    }

    #[test]
    fn empty_name_is_reported() {
        let (_dir, store) = store();
        let inj = Recording::default();
        let out = run(&store, &inj, true, set_cmd("", "/x"));
        assert!(out.starts_with("Invalid waypoint: name must not be empty"));
    }

    #[test]
    fn rem_reports_missing() {
        let (_dir, store) = store();
        let inj = Recording::default();
        run(&store, &inj, false, set_cmd("a", "/x"));
        assert_eq!(run(&store, &inj, false, Command::Rem { name: "a".into() }), "");
        assert_eq!(
            run(&store, &inj, false, Command::Rem { name: "a".into() }),
            "No such waypoint!\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_cwd_is_rejected_not_mangled() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_dir, store) = store();
        let inj = Recording::default();
        let cmd = Command::Set {
            name: "c".into(),
            path: PathBuf::from(OsStr::from_bytes(b"/tmp/caf\xe9")),
        };
        let out = run(&store, &inj, true, cmd);
        assert_eq!(out, "Invalid waypoint: path is not valid UTF-8\n");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn hint_line() {
        let (_dir, store) = store();
        let inj = Recording::default();
        assert_eq!(run(&store, &inj, false, Command::Hint), format!("{HINT}\n"));
    }

    #[test]
    fn corrupt_store_propagates() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "badline\n").unwrap();
        let inj = Recording::default();
        let mut confirm = |_: &str| false;
        let mut out = Vec::new();
        let mut ctx = Context {
            store: &store,
            injector: &inj,
            confirm: &mut confirm,
            out: &mut out,
        };
        let err = handle(&mut ctx, Command::Ls).unwrap_err();
        assert!(matches!(err, WaypointError::StoreCorrupt { .. }));
        assert!(out.is_empty());
    }
}
