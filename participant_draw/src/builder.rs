pub use crate::config::*;

/// A builder for assembling a pool before running a draw.
///
/// ```
/// pub use participant_draw::builder::Builder;
/// pub use participant_draw::{CellValue, DrawRules, RawRow};
/// # use participant_draw::DrawErrors;
///
/// let rules = DrawRules { want_selected: 1, want_alternates: 1, seed: Some(3) };
/// let mut builder = Builder::new(&rules);
///
/// builder.add_raw_row(&RawRow::new().with_cell("DNI", CellValue::Int(30111222)));
/// builder.add_raw_row(&RawRow::new().with_cell(" Apellido ", CellValue::Text("Sosa".to_string())));
///
/// let res = builder.draw()?;
/// assert_eq!(res.selected.len(), 1);
/// # Ok::<(), DrawErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: DrawRules,
    pub(crate) _participants: Vec<Participant>,
}

impl Builder {
    pub fn new(rules: &DrawRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _participants: Vec::new(),
        }
    }

    /// Adds a row as read from a roster. The row is normalized right away.
    pub fn add_raw_row(&mut self, row: &RawRow) {
        self._participants
            .extend(crate::schema::normalize(std::slice::from_ref(row)));
    }

    pub fn add_participant(&mut self, participant: &Participant) {
        self._participants.push(participant.clone());
    }

    /// The pool collected so far, in insertion order.
    pub fn participants(&self) -> &[Participant] {
        &self._participants
    }

    pub fn draw(&self) -> Result<DrawResult, DrawErrors> {
        crate::run_draw(&self._participants, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_insertion_order() {
        let mut b = Builder::new(&DrawRules::DEFAULT_RULES);
        b.add_participant(&Participant {
            number: "1".to_string(),
            ..Participant::default()
        });
        b.add_raw_row(&RawRow::new().with_cell("Número", CellValue::Int(2)));
        let numbers: Vec<&str> = b.participants().iter().map(|p| p.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[test]
    fn builder_default_rules_need_eighty() {
        let mut b = Builder::new(&DrawRules::DEFAULT_RULES);
        for i in 0..79 {
            b.add_raw_row(&RawRow::new().with_cell("Numero", CellValue::Int(i)));
        }
        assert_eq!(
            b.draw(),
            Err(DrawErrors::InsufficientParticipants {
                available: 79,
                requested: 80
            })
        );
        b.add_raw_row(&RawRow::new().with_cell("Numero", CellValue::Int(79)));
        let res = b.draw().unwrap();
        assert_eq!(res.selected.len(), 60);
        assert_eq!(res.alternates.len(), 20);
    }
}
