//! Line-based prompts for human players.
//!
//! [`Console`] owns one reader and one writer. Both human seats of a
//! hot-seat match share the same console through [`HumanSource`], which
//! borrows it only for the duration of a single prompt.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use duelsters_core::action::Action;
use duelsters_core::combatant::{ClassArchetype, Combatant};
use duelsters_core::controller::{ActionChoice, ActionSource};
use duelsters_core::dice::Dice;
use duelsters_core::error::{DuelError, Result};

use crate::display;

/// Class menu order; the entry after the last archetype is "Random".
const CLASS_MENU: [ClassArchetype; 5] = ClassArchetype::ALL;

/// Prompting console over any line reader and writer.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console reading `input` and writing `output`.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Gives back the writer.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes `text` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::Io`] if the writer fails.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Writes `prompt` and reads one trimmed line.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::Io`] if either side fails, or with
    /// [`io::ErrorKind::UnexpectedEof`] once input is closed.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DuelError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Asks until a non-blank name is given.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ask`].
    pub fn ask_name(&mut self, who: &str) -> Result<String> {
        loop {
            let name = self.ask(&format!("{who}, what is your name?\n> "))?;
            if !name.is_empty() {
                return Ok(name);
            }
            self.say("A duelist needs a name.")?;
        }
    }

    /// Asks for a class. `None` means "Random".
    ///
    /// # Errors
    ///
    /// Same as [`Self::ask`].
    pub fn ask_class(&mut self, name: &str) -> Result<Option<ClassArchetype>> {
        let mut menu = format!("{name}, choose your class:\n");
        for (i, archetype) in CLASS_MENU.iter().enumerate() {
            let stats = archetype.stats();
            menu.push_str(&format!(
                "{}. {:<9} HP {:>2} | ATK {:>2} | DEF {:>2} | SPD {:>2}\n",
                i + 1,
                archetype.to_string(),
                stats.max_health,
                stats.attack,
                stats.defense,
                stats.speed
            ));
        }
        menu.push_str(&format!("{}. Random\n> ", CLASS_MENU.len() + 1));

        loop {
            let answer = self.ask(&menu)?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=CLASS_MENU.len()).contains(&n) => return Ok(Some(CLASS_MENU[n - 1])),
                Ok(n) if n == CLASS_MENU.len() + 1 => return Ok(None),
                _ => self.say("Pick a number from the list.")?,
            }
        }
    }

    /// Asks a yes/no question. A blank answer counts as `default`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ask`].
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask(&format!("{question} {hint}\n> "))?;
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer y or n.")?,
            }
        }
    }

    /// Prompts `me` for an action from its menu.
    ///
    /// Answering `b`, or declining the confirmation, gives
    /// [`ActionChoice::Back`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::ask`].
    pub fn choose_action(&mut self, me: &Combatant) -> Result<ActionChoice> {
        let actions = me.available_actions();
        let menu = format!("\n{}\n> ", display::action_menu(me.name(), &actions));
        loop {
            let answer = self.ask(&menu)?;
            match parse_choice(&answer, &actions) {
                Some(ActionChoice::Commit(action)) => {
                    let sure = self.confirm(&format!("{}: {action}?", me.name()), true)?;
                    return Ok(if sure {
                        ActionChoice::Commit(action)
                    } else {
                        ActionChoice::Back
                    });
                }
                Some(ActionChoice::Back) => return Ok(ActionChoice::Back),
                None => self.say("Pick a number from the menu, or b to go back.")?,
            }
        }
    }
}

/// Reads a menu answer: a 1-based index into `actions`, or `b` for back.
#[must_use]
pub fn parse_choice(answer: &str, actions: &[Action]) -> Option<ActionChoice> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("b") {
        return Some(ActionChoice::Back);
    }
    let index = answer.parse::<usize>().ok()?.checked_sub(1)?;
    actions.get(index).copied().map(ActionChoice::Commit)
}

/// One human seat at a shared console.
#[derive(Debug)]
pub struct HumanSource<'a, R, W> {
    console: &'a RefCell<Console<R, W>>,
}

impl<'a, R, W> HumanSource<'a, R, W> {
    /// Seats a human at `console`.
    #[must_use]
    pub fn new(console: &'a RefCell<Console<R, W>>) -> Self {
        Self { console }
    }
}

impl<R: BufRead, W: Write> ActionSource for HumanSource<'_, R, W> {
    fn choose(
        &mut self,
        me: &Combatant,
        _opponent: &Combatant,
        _dice: &mut dyn Dice,
    ) -> Result<ActionChoice> {
        let choice = self.console.borrow_mut().choose_action(me)?;
        tracing::debug!(combatant = me.name(), ?choice, "human chose");
        Ok(choice)
    }
}
