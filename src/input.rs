use chroma_core::{LightColor, Response, TestType};
use winit::keyboard::KeyCode;

/// Longest digit string the entry field accepts.
const MAX_DIGITS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    None,
    Submit(Response),
    Abort,
}

/// Answer being composed for the current trial.
#[derive(Debug, Default)]
pub struct AnswerInput {
    digits: String,
    lights: Vec<LightColor>,
}

impl AnswerInput {
    pub fn clear(&mut self) {
        self.digits.clear();
        self.lights.clear();
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn lights(&self) -> &[LightColor] {
        &self.lights
    }

    pub fn on_key(&mut self, key: KeyCode, test_type: TestType) -> InputAction {
        if key == KeyCode::Escape {
            return InputAction::Abort;
        }
        match test_type {
            TestType::Ishihara => self.on_digit_key(key),
            TestType::Lantern => self.on_light_key(key),
        }
    }

    fn on_digit_key(&mut self, key: KeyCode) -> InputAction {
        match key {
            KeyCode::Backspace => {
                self.digits.pop();
            }
            KeyCode::Enter | KeyCode::NumpadEnter => {
                let answer = self.digits.trim();
                if !answer.is_empty() {
                    let response = Response::Digits(answer.to_string());
                    self.clear();
                    return InputAction::Submit(response);
                }
            }
            _ => {
                if let Some(d) = digit_for(key) {
                    if self.digits.len() < MAX_DIGITS {
                        self.digits.push(d);
                    }
                }
            }
        }
        InputAction::None
    }

    fn on_light_key(&mut self, key: KeyCode) -> InputAction {
        let color = match key {
            KeyCode::KeyR => LightColor::Red,
            KeyCode::KeyG => LightColor::Green,
            KeyCode::KeyW => LightColor::White,
            KeyCode::Backspace => {
                self.lights.pop();
                return InputAction::None;
            }
            _ => return InputAction::None,
        };
        self.lights.push(color);
        if let [left, right] = self.lights[..] {
            self.clear();
            return InputAction::Submit(Response::Lights { left, right });
        }
        InputAction::None
    }
}

fn digit_for(key: KeyCode) -> Option<char> {
    let d = match key {
        KeyCode::Digit0 | KeyCode::Numpad0 => '0',
        KeyCode::Digit1 | KeyCode::Numpad1 => '1',
        KeyCode::Digit2 | KeyCode::Numpad2 => '2',
        KeyCode::Digit3 | KeyCode::Numpad3 => '3',
        KeyCode::Digit4 | KeyCode::Numpad4 => '4',
        KeyCode::Digit5 | KeyCode::Numpad5 => '5',
        KeyCode::Digit6 | KeyCode::Numpad6 => '6',
        KeyCode::Digit7 | KeyCode::Numpad7 => '7',
        KeyCode::Digit8 | KeyCode::Numpad8 => '8',
        KeyCode::Digit9 | KeyCode::Numpad9 => '9',
        _ => return None,
    };
    Some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(input: &mut AnswerInput, keys: &[KeyCode], test: TestType) -> InputAction {
        let mut last = InputAction::None;
        for &k in keys {
            last = input.on_key(k, test);
        }
        last
    }

    #[test]
    fn digits_are_submitted_on_enter() {
        let mut input = AnswerInput::default();
        let action = type_keys(
            &mut input,
            &[KeyCode::Digit2, KeyCode::Numpad9, KeyCode::Enter],
            TestType::Ishihara,
        );
        assert_eq!(action, InputAction::Submit(Response::Digits("29".into())));
        assert_eq!(input.digits(), "");
    }

    #[test]
    fn backspace_and_length_limit() {
        let mut input = AnswerInput::default();
        type_keys(
            &mut input,
            &[
                KeyCode::Digit1,
                KeyCode::Digit2,
                KeyCode::Digit3,
                KeyCode::Digit4,
                KeyCode::Backspace,
            ],
            TestType::Ishihara,
        );
        assert_eq!(input.digits(), "12");
    }

    #[test]
    fn empty_entry_is_not_submitted() {
        let mut input = AnswerInput::default();
        assert_eq!(input.on_key(KeyCode::Enter, TestType::Ishihara), InputAction::None);
    }

    #[test]
    fn lantern_submits_after_two_colors() {
        let mut input = AnswerInput::default();
        assert_eq!(input.on_key(KeyCode::KeyW, TestType::Lantern), InputAction::None);
        assert_eq!(input.lights(), &[LightColor::White]);
        assert_eq!(
            input.on_key(KeyCode::KeyG, TestType::Lantern),
            InputAction::Submit(Response::Lights {
                left: LightColor::White,
                right: LightColor::Green
            })
        );
        assert!(input.lights().is_empty());
    }

    #[test]
    fn lantern_ignores_digits_and_escape_aborts() {
        let mut input = AnswerInput::default();
        assert_eq!(input.on_key(KeyCode::Digit1, TestType::Lantern), InputAction::None);
        assert_eq!(input.on_key(KeyCode::KeyR, TestType::Ishihara), InputAction::None);
        assert_eq!(input.on_key(KeyCode::Escape, TestType::Lantern), InputAction::Abort);
    }
}
