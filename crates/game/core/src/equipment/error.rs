//! Placement rejections.

use crate::error::{ErrorSeverity, GameError};

/// Why an item cannot be placed in or taken out of a slot.
///
/// Every variant is a normal gameplay outcome: nothing was mutated and the
/// player is shown the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipError {
    #[error("Sorry, not possible.")]
    NotPossible,

    #[error("You cannot take this object.")]
    CannotPickup,

    #[error("You cannot dress this object there.")]
    CannotBeDressed,

    #[error("Put this object in both hands.")]
    PutThisObjectInBothHands,

    #[error("Put this object in your hand.")]
    PutThisObjectInYourHand,

    #[error("Both hands need to be free.")]
    BothHandsNeedToBeFree,

    #[error("Drop the double-handed object first.")]
    DropTwoHandedItem,

    #[error("You may only use one shield.")]
    CanOnlyUseOneShield,

    #[error("You may only use one weapon.")]
    CanOnlyUseOneWeapon,

    #[error("There is not enough room.")]
    NotEnoughRoom,

    #[error("This object is too heavy for you to carry.")]
    NotEnoughCapacity,

    #[error("You cannot move this object.")]
    NotMoveable,

    /// An equip or unequip hook refused the move.
    #[error("You cannot dress this object there.")]
    HookRejected,
}

impl GameError for EquipError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EquipError::NotPossible => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use EquipError::*;
        match self {
            NotPossible => "EQUIP_NOT_POSSIBLE",
            CannotPickup => "EQUIP_CANNOT_PICKUP",
            CannotBeDressed => "EQUIP_CANNOT_BE_DRESSED",
            PutThisObjectInBothHands => "EQUIP_PUT_IN_BOTH_HANDS",
            PutThisObjectInYourHand => "EQUIP_PUT_IN_YOUR_HAND",
            BothHandsNeedToBeFree => "EQUIP_BOTH_HANDS_NEED_TO_BE_FREE",
            DropTwoHandedItem => "EQUIP_DROP_TWO_HANDED_ITEM",
            CanOnlyUseOneShield => "EQUIP_ONE_SHIELD",
            CanOnlyUseOneWeapon => "EQUIP_ONE_WEAPON",
            NotEnoughRoom => "EQUIP_NOT_ENOUGH_ROOM",
            NotEnoughCapacity => "EQUIP_NOT_ENOUGH_CAPACITY",
            NotMoveable => "EQUIP_NOT_MOVEABLE",
            HookRejected => "EQUIP_HOOK_REJECTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_recoverable_and_coded() {
        assert!(EquipError::BothHandsNeedToBeFree.severity().is_recoverable());
        assert_eq!(
            EquipError::CanOnlyUseOneShield.error_code(),
            "EQUIP_ONE_SHIELD"
        );
        assert_eq!(
            EquipError::NotEnoughCapacity.to_string(),
            "This object is too heavy for you to carry."
        );
    }
}
