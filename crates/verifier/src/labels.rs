//! Label pass: attached labels are unique and never `EXIT`; every jump
//! target is attached somewhere in the same definition or is `EXIT`.

use std::collections::BTreeMap;

use slang_common::{Definition, Label};

use crate::error::VerifyError;

/// Run the label pass over one definition.
pub fn check_labels(def: &Definition) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let mut attached: BTreeMap<Label, usize> = BTreeMap::new();

    for (at, instr) in def.instructions.iter().enumerate() {
        match instr.label {
            Label::Empty => {}
            Label::Exit => errors.push(VerifyError::ExitAsLabel {
                function: def.name.clone(),
                at,
            }),
            label => {
                if let Some(&first) = attached.get(&label) {
                    errors.push(VerifyError::DuplicateLabel {
                        function: def.name.clone(),
                        label,
                        at,
                        first,
                    });
                } else {
                    attached.insert(label, at);
                }
            }
        }
    }

    for (at, instr) in def.instructions.iter().enumerate() {
        if let Some(label @ Label::Named(_)) = instr.target() {
            if !attached.contains_key(&label) {
                errors.push(VerifyError::UndefinedLabel {
                    function: def.name.clone(),
                    label,
                    at,
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use slang_common::{Instruction, Variable};

    fn def(instructions: Vec<Instruction>) -> Definition {
        Definition::new("T", instructions)
    }

    #[test]
    fn backward_and_forward_jumps_resolve() {
        let d = def(vec![
            Instruction::jump_zero(Variable::input(1), Label::Named(2)),
            Instruction::decrease(Variable::input(1)).labeled(Label::Named(1)),
            Instruction::jump_not_zero(Variable::input(1), Label::Named(1)),
            Instruction::neutral(Variable::RESULT).labeled(Label::Named(2)),
            Instruction::goto_label(Label::Exit),
        ]);
        assert!(check_labels(&d).is_empty());
    }

    #[test]
    fn undefined_target() {
        let d = def(vec![Instruction::goto_label(Label::Named(3))]);
        assert_eq!(
            check_labels(&d),
            vec![VerifyError::UndefinedLabel {
                function: "T".to_string(),
                label: Label::Named(3),
                at: 0
            }]
        );
    }

    #[test]
    fn duplicate_and_exit_labels() {
        let d = def(vec![
            Instruction::increase(Variable::RESULT).labeled(Label::Named(1)),
            Instruction::increase(Variable::RESULT).labeled(Label::Named(1)),
            Instruction::increase(Variable::RESULT).labeled(Label::Exit),
        ]);
        let errors = check_labels(&d);
        assert!(errors.iter().any(|e| matches!(e, VerifyError::DuplicateLabel { at: 1, first: 0, .. })));
        assert!(errors.iter().any(|e| matches!(e, VerifyError::ExitAsLabel { at: 2, .. })));
    }
}
