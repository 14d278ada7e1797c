//! Add-recipe dialogue: a linear four-step input collection flow.
//!
//! ```text
//! Entry -> AwaitTitle -> AwaitIngredients -> AwaitSteps -> AwaitPhoto -> Complete
//!                                                              |  ^
//!                                                              +--+ (rejected input)
//! any live state --cancel--> Aborted
//! ```
//!
//! Intermediate steps accept empty values; the submission is checked only
//! when the photo step completes.

use crate::errors::BotError;
use crate::recipe::NewRecipe;

/// Reply that skips the photo step
pub const SKIP_PHOTO: &str = "-";

/// Observable state of a user's add-recipe flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddRecipeState {
    /// No flow in progress
    #[default]
    Entry,
    AwaitTitle,
    AwaitIngredients,
    AwaitSteps,
    AwaitPhoto,
    Complete,
    Aborted,
}

/// Fields collected so far
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingSubmission {
    pub title: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<String>,
    pub photo_reference: Option<String>,
}

impl PendingSubmission {
    /// Assemble the final record, rejecting empty or missing required fields
    pub fn into_recipe(self) -> Result<NewRecipe, BotError> {
        let title = non_empty(self.title).ok_or(BotError::ValidationFailure("title"))?;
        let ingredients = self
            .ingredients
            .filter(|list| !list.is_empty())
            .ok_or(BotError::ValidationFailure("ingredients"))?;
        let steps = non_empty(self.steps).ok_or(BotError::ValidationFailure("steps"))?;
        Ok(NewRecipe {
            title,
            ingredients,
            steps,
            photo_reference: self.photo_reference,
        })
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.title.as_deref().map_or(true, str::is_empty) {
            Some("title")
        } else if self.ingredients.as_ref().map_or(true, Vec::is_empty) {
            Some("ingredients")
        } else if self.steps.as_deref().map_or(true, str::is_empty) {
            Some("steps")
        } else {
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Split a comma-separated ingredient list, trimming and dropping empty parts
pub fn split_ingredients(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// One inbound event for the flow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowInput<'a> {
    Text(&'a str),
    /// Reference of the highest-resolution photo size
    Photo(String),
    Cancel,
    /// Any other message kind: documents, stickers, voice, locations
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    Cancelled,
    /// A required field was empty when the flow tried to complete
    Incomplete(&'static str),
}

/// Result of feeding one input to a flow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Moved on to the next step
    Advanced(AddRecipeFlow),
    /// Input did not fit the current step; state and data are unchanged
    Rejected(AddRecipeFlow),
    Completed(NewRecipe),
    Aborted(AbortReason),
}

impl Transition {
    pub fn state(&self) -> AddRecipeState {
        match self {
            Transition::Advanced(flow) | Transition::Rejected(flow) => flow.state(),
            Transition::Completed(_) => AddRecipeState::Complete,
            Transition::Aborted(_) => AddRecipeState::Aborted,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Transition::Completed(_) | Transition::Aborted(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Title,
    Ingredients,
    Steps,
    Photo,
}

/// A live add-recipe flow for one user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddRecipeFlow {
    step: Step,
    draft: PendingSubmission,
}

impl AddRecipeFlow {
    /// A fresh flow waiting for the title
    pub fn start() -> Self {
        Self {
            step: Step::Title,
            draft: PendingSubmission::default(),
        }
    }

    pub fn state(&self) -> AddRecipeState {
        match self.step {
            Step::Title => AddRecipeState::AwaitTitle,
            Step::Ingredients => AddRecipeState::AwaitIngredients,
            Step::Steps => AddRecipeState::AwaitSteps,
            Step::Photo => AddRecipeState::AwaitPhoto,
        }
    }

    pub fn draft(&self) -> &PendingSubmission {
        &self.draft
    }

    /// Feed one input and return where the flow ends up
    pub fn advance(mut self, input: FlowInput<'_>) -> Transition {
        if input == FlowInput::Cancel {
            return Transition::Aborted(AbortReason::Cancelled);
        }

        match (self.step, input) {
            (Step::Title, FlowInput::Text(text)) => {
                self.draft.title = Some(text.trim().to_string());
                self.step = Step::Ingredients;
                Transition::Advanced(self)
            }
            (Step::Ingredients, FlowInput::Text(text)) => {
                self.draft.ingredients = Some(split_ingredients(text));
                self.step = Step::Steps;
                Transition::Advanced(self)
            }
            (Step::Steps, FlowInput::Text(text)) => {
                self.draft.steps = Some(text.trim().to_string());
                self.step = Step::Photo;
                Transition::Advanced(self)
            }
            (Step::Photo, input) => {
                // Checked before looking at the input, whatever it is
                if let Some(field) = self.draft.missing_field() {
                    return Transition::Aborted(AbortReason::Incomplete(field));
                }
                match input {
                    FlowInput::Photo(reference) => self.draft.photo_reference = Some(reference),
                    FlowInput::Text(text) if text.trim() == SKIP_PHOTO => {
                        self.draft.photo_reference = None
                    }
                    _ => return Transition::Rejected(self),
                }
                match self.draft.into_recipe() {
                    Ok(recipe) => Transition::Completed(recipe),
                    Err(BotError::ValidationFailure(field)) => {
                        Transition::Aborted(AbortReason::Incomplete(field))
                    }
                    Err(_) => Transition::Aborted(AbortReason::Incomplete("submission")),
                }
            }
            (_, FlowInput::Photo(_) | FlowInput::Other | FlowInput::Cancel) => Transition::Rejected(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(inputs: &[FlowInput<'_>]) -> Transition {
        let mut flow = AddRecipeFlow::start();
        let mut last = None;
        for input in inputs {
            match flow.clone().advance(input.clone()) {
                Transition::Advanced(next) | Transition::Rejected(next) => {
                    flow = next.clone();
                    last = Some(Transition::Advanced(next));
                }
                terminal => return terminal,
            }
        }
        last.expect("at least one input")
    }

    #[test]
    fn test_split_ingredients() {
        assert_eq!(split_ingredients("Яйцо, Соль"), vec!["Яйцо", "Соль"]);
        assert_eq!(split_ingredients(" a ,, ,b,"), vec!["a", "b"]);
        assert!(split_ingredients(" , ").is_empty());
    }

    #[test]
    fn test_states_in_order() {
        let flow = AddRecipeFlow::start();
        assert_eq!(flow.state(), AddRecipeState::AwaitTitle);
        let Transition::Advanced(flow) = flow.advance(FlowInput::Text(" Суп ")) else {
            panic!("title should advance");
        };
        assert_eq!(flow.state(), AddRecipeState::AwaitIngredients);
        assert_eq!(flow.draft().title.as_deref(), Some("Суп"));
        let Transition::Advanced(flow) = flow.advance(FlowInput::Text("Вода")) else {
            panic!("ingredients should advance");
        };
        assert_eq!(flow.state(), AddRecipeState::AwaitSteps);
        let Transition::Advanced(flow) = flow.advance(FlowInput::Text("Варить")) else {
            panic!("steps should advance");
        };
        assert_eq!(flow.state(), AddRecipeState::AwaitPhoto);
    }

    #[test]
    fn test_complete_with_skip() {
        let transition = run(&[
            FlowInput::Text("Тест"),
            FlowInput::Text("Яйцо, Соль"),
            FlowInput::Text("Смешать."),
            FlowInput::Text("-"),
        ]);
        let Transition::Completed(recipe) = transition else {
            panic!("expected completion, got {transition:?}");
        };
        assert_eq!(recipe.title, "Тест");
        assert_eq!(recipe.ingredients, vec!["Яйцо", "Соль"]);
        assert_eq!(recipe.steps, "Смешать.");
        assert!(recipe.photo_reference.is_none());
    }

    #[test]
    fn test_complete_with_photo() {
        let transition = run(&[
            FlowInput::Text("Тест"),
            FlowInput::Text("Яйцо"),
            FlowInput::Text("Смешать."),
            FlowInput::Photo("AgACAgIAAxk".to_string()),
        ]);
        let Transition::Completed(recipe) = transition else {
            panic!("expected completion");
        };
        assert_eq!(recipe.photo_reference.as_deref(), Some("AgACAgIAAxk"));
    }

    #[test]
    fn test_photo_step_self_loop() {
        let flow = AddRecipeFlow::start()
            .advance(FlowInput::Text("Тест"));
        let Transition::Advanced(flow) = flow else { panic!() };
        let Transition::Advanced(flow) = flow.advance(FlowInput::Text("Яйцо")) else { panic!() };
        let Transition::Advanced(flow) = flow.advance(FlowInput::Text("Смешать.")) else { panic!() };
        let before = flow.clone();
        let transition = flow.advance(FlowInput::Text("вот фото"));
        assert_eq!(transition, Transition::Rejected(before));
        assert_eq!(transition.state(), AddRecipeState::AwaitPhoto);
        assert!(!transition.is_terminal());
    }

    #[test]
    fn test_empty_title_accepted_then_aborts() {
        let transition = run(&[
            FlowInput::Text("   "),
            FlowInput::Text("Яйцо"),
            FlowInput::Text("Смешать."),
            FlowInput::Text("-"),
        ]);
        assert_eq!(transition, Transition::Aborted(AbortReason::Incomplete("title")));
    }

    #[test]
    fn test_empty_ingredients_abort_even_on_invalid_photo_input() {
        let transition = run(&[
            FlowInput::Text("Тест"),
            FlowInput::Text(" , ,"),
            FlowInput::Text("Смешать."),
            FlowInput::Text("не фото"),
        ]);
        assert_eq!(
            transition,
            Transition::Aborted(AbortReason::Incomplete("ingredients"))
        );
    }

    #[test]
    fn test_cancel_from_any_state() {
        let transition = run(&[FlowInput::Text("Тест"), FlowInput::Cancel]);
        assert_eq!(transition, Transition::Aborted(AbortReason::Cancelled));
        assert_eq!(transition.state(), AddRecipeState::Aborted);
        assert_eq!(
            AddRecipeFlow::start().advance(FlowInput::Cancel),
            Transition::Aborted(AbortReason::Cancelled)
        );
    }

    #[test]
    fn test_photo_in_text_step_is_rejected() {
        let flow = AddRecipeFlow::start();
        let transition = flow.clone().advance(FlowInput::Photo("x".to_string()));
        assert_eq!(transition, Transition::Rejected(flow));
    }

    #[test]
    fn test_unsupported_message_is_rejected_at_every_step() {
        let flow = AddRecipeFlow::start();
        assert_eq!(flow.clone().advance(FlowInput::Other), Transition::Rejected(flow));

        let Transition::Advanced(flow) = AddRecipeFlow::start().advance(FlowInput::Text("Тест")) else { panic!() };
        let Transition::Advanced(flow) = flow.advance(FlowInput::Text("Яйцо")) else { panic!() };
        let Transition::Advanced(flow) = flow.advance(FlowInput::Text("Смешать.")) else { panic!() };
        let transition = flow.clone().advance(FlowInput::Other);
        assert_eq!(transition.state(), AddRecipeState::AwaitPhoto);
        assert_eq!(transition, Transition::Rejected(flow));
    }

    #[test]
    fn test_into_recipe_names_missing_field() {
        let draft = PendingSubmission {
            title: Some("a".to_string()),
            ingredients: Some(vec!["b".to_string()]),
            steps: None,
            photo_reference: None,
        };
        assert!(matches!(
            draft.into_recipe(),
            Err(BotError::ValidationFailure("steps"))
        ));
    }

    #[test]
    fn test_default_state_is_entry() {
        assert_eq!(AddRecipeState::default(), AddRecipeState::Entry);
    }
}
