mod decks;
