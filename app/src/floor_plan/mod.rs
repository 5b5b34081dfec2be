//! Static description of the surveyed floors: background image, survey form
//! and the outlines of the rooms in image pixel coordinates. Outlines are
//! only drawn by the client, nothing here does hit-testing.

#[derive(Debug, Clone, Copy)]
pub struct FloorPlan {
    pub id: &'static str,
    pub image: &'static str,
    pub form_url: &'static str,
    pub title: &'static str,
    pub rooms: &'static [RoomOutline],
}

#[derive(Debug, Clone, Copy)]
pub struct RoomOutline {
    pub id: &'static str,
    shape: Shape,
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Rect([i32; 2], [i32; 2]),
    Polygon(&'static [[i32; 2]]),
}

const fn rect(id: &'static str, p1: [i32; 2], p2: [i32; 2]) -> RoomOutline {
    RoomOutline {
        id,
        shape: Shape::Rect(p1, p2),
    }
}

const fn polygon(id: &'static str, points: &'static [[i32; 2]]) -> RoomOutline {
    RoomOutline {
        id,
        shape: Shape::Polygon(points),
    }
}

impl RoomOutline {
    /// Corner points, rectangles expanded clockwise from the first corner.
    pub fn polygon(&self) -> Vec<[i32; 2]> {
        match self.shape {
            Shape::Rect([x1, y1], [x2, y2]) => vec![[x1, y1], [x1, y2], [x2, y2], [x2, y1]],
            Shape::Polygon(points) => points.to_vec(),
        }
    }
}

impl serde::Serialize for RoomOutline {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct as _;

        let mut s = serializer.serialize_struct("RoomOutline", 2)?;
        s.serialize_field("id", self.id)?;
        s.serialize_field("polygon", &self.polygon())?;
        s.end()
    }
}

const SURVEY_FORM: &str = "https://docs.google.com/forms/d/e/1FAIpQLSeurE3m8ZLLfBH4TqBIsdQXjDqmfpIYrYlW9dnJOf7W2gLw3g/viewform?usp=header";

static COLLEGE_LIBRARY_1_ROOMS: &[RoomOutline] = &[
    rect("1191B", [282, 764], [203, 688]),
    rect("1191D", [202, 570], [283, 686]),
    rect("1191A", [201, 481], [282, 569]),
    polygon(
        "1191 Main Collection",
        &[
            [104, 325],
            [282, 325],
            [285, 485],
            [203, 483],
            [204, 762],
            [66, 761],
            [67, 676],
            [105, 675],
            [103, 567],
            [66, 568],
            [64, 479],
            [101, 475],
            [101, 393],
            [104, 389],
        ],
    ),
    rect("1191E", [63, 389], [99, 477]),
    rect("1193D Instruction Classroom", [104, 183], [191, 319]),
    rect("1193C", [64, 202], [99, 226]),
    rect("1193B", [65, 228], [99, 252]),
    rect("1193A", [63, 254], [100, 281]),
    rect("1193 Ethnic Studies Collection", [192, 181], [326, 319]),
    rect("1201 Security Office", [332, 180], [380, 268]),
    polygon(
        "1209 First Floor Center",
        &[
            [654, 280],
            [654, 179],
            [385, 181],
            [384, 280],
            [428, 282],
            [431, 338],
            [416, 332],
            [400, 329],
            [350, 329],
            [339, 329],
            [339, 361],
            [376, 361],
            [380, 381],
            [653, 381],
            [653, 359],
            [711, 361],
            [710, 332],
            [657, 331],
            [625, 332],
            [607, 338],
            [605, 279],
        ],
    ),
    rect("West Stairwell", [379, 384], [470, 466]),
    rect("East Stairwell", [568, 384], [654, 466]),
    rect("1250 Open Book Cafe", [710, 180], [842, 283]),
    polygon(
        "1250 Open Book Collection",
        &[
            [840, 200],
            [893, 201],
            [893, 553],
            [702, 551],
            [698, 361],
            [712, 361],
            [712, 333],
            [712, 283],
            [842, 284],
        ],
    ),
    polygon("1250A Vending", &[[893, 554], [893, 657], [807, 657], [703, 552]]),
    rect("Entrance/Exit", [474, 383], [562, 465]),
    rect("Elevator", [284, 323], [338, 422]),
];

static FLOOR_PLANS: &[FloorPlan] = &[
    FloorPlan {
        id: "college-library-1",
        image: "static/images/cl1.jpg",
        form_url: SURVEY_FORM,
        title: "College Library First Floor",
        rooms: COLLEGE_LIBRARY_1_ROOMS,
    },
    FloorPlan {
        id: "college-library-2",
        image: "static/images/cl2.jpg",
        form_url: SURVEY_FORM,
        title: "College Library Second Floor",
        rooms: &[],
    },
    FloorPlan {
        id: "college-library-3",
        image: "static/images/cl3.jpg",
        form_url: SURVEY_FORM,
        title: "College Library Third Floor",
        rooms: &[],
    },
];

pub fn find(location: &str) -> Option<&'static FloorPlan> {
    FLOOR_PLANS.iter().find(|plan| plan.id == location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn test_find_known_location() {
        let plan = find("college-library-2").unwrap();

        assert_eq!(plan.title, "College Library Second Floor");
        assert!(plan.rooms.is_empty());
    }

    #[test]
    fn test_unknown_location() {
        assert!(find("college-library-9").is_none());
    }

    #[test]
    fn test_rect_expands_to_four_corners() {
        let elevator = find("college-library-1")
            .unwrap()
            .rooms
            .iter()
            .find(|r| r.id == "Elevator")
            .unwrap();

        assert_json_eq!(
            elevator,
            json!({
                "id": "Elevator",
                "polygon": [[284, 323], [284, 422], [338, 422], [338, 323]]
            })
        );
    }

    #[test]
    fn test_room_ids_are_unique() {
        let rooms = find("college-library-1").unwrap().rooms;
        let mut ids: Vec<&str> = rooms.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), rooms.len());
    }
}
